// Loading rule tables, the roster and settings from TOML files.
use fixturecal::config::{self, Settings};
use fixturecal::context::{AppContext, TestContext};
use fixturecal::model::Category;
use fixturecal::rewrite::RuleSet;
use std::fs;

const RULES: &str = r#"
[[club]]
name = "Riverside Hockey Club"
code = "RHC"

[[club]]
name = "Example Hockey Club"
code = "EHC"

[[competition]]
pattern = "{{GENDER}} Pennant A - {{YEAR}}"
replacement = "{{GENDER}} PenA"

[[competition]]
pattern = "Midweek Masters 35\\+ - {{YEAR}}"
replacement = "Masters 35+"
duration = 60

[[round]]
regex = '\bRound (\d+)\b'
replacement = "R$1"
"#;

const ROSTER: &str = r#"
[[competition]]
name = "Men's Pennant A - 2025"
fixture_url = "https://www.hockeyvictoria.org.au/games/team/21935/336963"
ladder_url = "https://www.hockeyvictoria.org.au/pointscore/21935/37286"
publish_targets = ["abc123@group.calendar.google.com"]

[[competition]]
name = "Midweek Masters 35+ - 2025"
source_team_ref = "21935/400001"
match_duration_minutes = 60
active = false
"#;

#[test]
fn test_rule_tables_from_toml() {
    let ctx = TestContext::new();
    fs::write(ctx.get_rules_path().unwrap(), RULES).unwrap();

    let tables = config::load_rule_tables(&ctx).unwrap();
    assert_eq!(tables.clubs.len(), 2);
    assert_eq!(tables.competitions.len(), 2);
    assert_eq!(tables.competitions[0].duration, None);
    assert_eq!(tables.competitions[1].duration, Some(60));
    assert_eq!(tables.rounds.len(), 1);

    let set = RuleSet::compile(&tables, 2025).unwrap();
    assert_eq!(
        set.rewrite("Women's Pennant A - 2025 Round 7 - Riverside Hockey Club 2 v Example Hockey Club 1"),
        "Women PenA R7 - RHC 2 v EHC 1"
    );
    assert_eq!(set.duration_for("Midweek Masters 35+ - 2025 Round 1"), Some(60));
}

#[test]
fn test_roster_from_toml() {
    let ctx = TestContext::new();
    fs::write(ctx.get_roster_path().unwrap(), ROSTER).unwrap();

    let roster = config::load_roster(&ctx).unwrap();
    assert_eq!(roster.entries.len(), 2);

    let pennant = roster.find_by_name("Men's Pennant A - 2025").unwrap();
    assert!(pennant.active);
    assert_eq!(pennant.team_path(), "21935/336963");
    assert_eq!(pennant.competition_id(), Some("21935/37286"));
    assert_eq!(pennant.match_duration_minutes, None);
    assert_eq!(pennant.duration_minutes(), 90);
    assert_eq!(pennant.targets(), vec!["abc123@group.calendar.google.com"]);
    assert_eq!(pennant.classify(), Category::Mens);

    let masters = roster.find_by_name("Midweek Masters 35+ - 2025").unwrap();
    assert!(!masters.active);
    assert_eq!(masters.duration_minutes(), 60);
    assert_eq!(masters.classify(), Category::Midweek);

    let active: Vec<&str> = roster.active().map(|e| e.name.as_str()).collect();
    assert_eq!(active, vec!["Men's Pennant A - 2025"]);
}

#[test]
fn test_missing_rules_is_an_error() {
    let ctx = TestContext::new();
    let err = config::load_rule_tables(&ctx).unwrap_err();
    assert!(format!("{:#}", err).contains("rules"));
}

#[test]
fn test_invalid_rule_pattern_is_reported() {
    let ctx = TestContext::new();
    fs::write(
        ctx.get_rules_path().unwrap(),
        "[[round]]\nregex = \"Round (\\\\d+\"\nreplacement = \"R$1\"\n",
    )
    .unwrap();

    let tables = config::load_rule_tables(&ctx).unwrap();
    assert!(RuleSet::compile(&tables, 2025).is_err());
}

#[test]
fn test_settings_round_trip() {
    let ctx = TestContext::new();
    let settings = Settings {
        calendars_homepage: Some("https://calendars.example/".into()),
        max_concurrent: 3,
        ..Default::default()
    };
    settings.save(&ctx).unwrap();

    let loaded = Settings::load(&ctx).unwrap();
    assert_eq!(loaded, settings);
    assert_eq!(loaded.download_dir(&ctx).unwrap(), ctx.get_download_dir().unwrap());
}
