// File: ./src/cli.rs
//! Command-line argument handling and help text for the `fixturecal` binary.
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Process { competition: Option<String> },
    List,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub command: Command,
    pub root: Option<PathBuf>,
    pub verbose: bool,
}

/// Parses `args` (without the binary name).
pub fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut command = None;
    let mut competition = None;
    let mut root = None;
    let mut verbose = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" | "help" => command = Some(Command::Help),
            "-v" | "--verbose" => verbose = true,
            "-r" | "--root" => {
                i += 1;
                let value = args.get(i).ok_or("--root needs a path")?;
                root = Some(PathBuf::from(value));
            }
            "-c" | "--competition" => {
                i += 1;
                let value = args.get(i).ok_or("--competition needs a name")?;
                competition = Some(value.clone());
            }
            "process" if command.is_none() => command = Some(Command::Process { competition: None }),
            "list" if command.is_none() => command = Some(Command::List),
            other => return Err(format!("Unknown argument: {}", other)),
        }
        i += 1;
    }

    let command = match command.unwrap_or(Command::Process { competition: None }) {
        Command::Process { .. } => Command::Process { competition },
        other => other,
    };

    Ok(Args {
        command,
        root,
        verbose,
    })
}

pub fn print_help(binary_name: &str) {
    println!(
        "Fixturecal v{} - Clean and enrich fixture calendars",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    {} [process] [--competition <name>] [--root <path>] [--verbose]", binary_name);
    println!("    {} list [--root <path>]", binary_name);
    println!("    {} --help", binary_name);
    println!();
    println!("OPTIONS:");
    println!("    -c, --competition <name>  Only process the named roster entry.");
    println!("    -r, --root <path>         Use a different directory for config and data.");
    println!("    -v, --verbose             Debug logging.");
    println!("    -h, --help                Show this help message.");
    println!();
    println!("FILES (under the config directory):");
    println!("    config.toml   Settings (homepage link, round link base, worker limits)");
    println!("    rules.toml    [[club]], [[competition]] and [[round]] rewrite tables");
    println!("    roster.toml   [[competition]] entries to process");
    println!();
    println!("Raw calendars are read from <data>/downloads/<name>.ics and written to");
    println!("<data>/processed/<target>.ics. A run summary goes to <data>/report.json.");
}
