use anyhow::{Context, Result};
use chrono::Utc;
use fixturecal::cli::{self, Command};
use fixturecal::config::{self, Settings};
use fixturecal::context::{AppContext, StandardContext};
use fixturecal::rewrite::RuleSet;
use fixturecal::runner::Runner;
use fixturecal::storage::{DirectoryFetcher, DirectoryPublisher};
use fixturecal::transcode::TranscodeOptions;
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};
use std::env;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    let argv: Vec<String> = env::args().skip(1).collect();
    let args = match cli::parse_args(&argv) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{}", msg);
            cli::print_help("fixturecal");
            std::process::exit(2);
        }
    };

    if args.command == Command::Help {
        cli::print_help("fixturecal");
        return Ok(());
    }

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let _ = TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );

    let ctx = StandardContext::new(args.root.clone());
    let roster = config::load_roster(&ctx)?;

    match args.command {
        Command::List => {
            for entry in &roster.entries {
                println!(
                    "{} [{}] {}",
                    if entry.active { "+" } else { "-" },
                    entry.classify(),
                    entry.name
                );
            }
            Ok(())
        }
        Command::Process { competition } => {
            let settings = Settings::load(&ctx)?;
            let tables = config::load_rule_tables(&ctx)?;
            let rules = RuleSet::compile_for_current_year(&tables)
                .context("Invalid rewrite rules")?;

            let entries = match &competition {
                Some(name) => vec![
                    roster
                        .find_by_name(name)
                        .cloned()
                        .ok_or_else(|| anyhow::anyhow!("No roster entry named '{}'", name))?,
                ],
                None => roster.active().cloned().collect(),
            };

            let runner = Runner::new(
                Arc::new(rules),
                Arc::new(DirectoryFetcher::new(settings.download_dir(&ctx)?)),
                Arc::new(DirectoryPublisher::new(settings.output_dir(&ctx)?)),
                TranscodeOptions::from_settings(&settings, Utc::now()),
            )
            .with_limits(
                settings.max_concurrent,
                Duration::from_millis(settings.batch_delay_ms),
            );

            let report = runner.run(entries).await;
            report.save(&ctx as &dyn AppContext)?;

            println!(
                "Processed {}/{} calendars, {} events dropped",
                report.succeeded(),
                report.outcomes.len(),
                report.dropped_events()
            );
            for failed in report.outcomes.iter().filter(|o| !o.success) {
                println!(
                    "  FAILED {}: {}",
                    failed.name,
                    failed.error.as_deref().unwrap_or("unknown error")
                );
            }

            if report.failed() > 0 {
                anyhow::bail!("{} of {} calendars failed", report.failed(), report.outcomes.len());
            }
            Ok(())
        }
        Command::Help => Ok(()),
    }
}
