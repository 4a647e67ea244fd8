// File: ./src/model/roster.rs
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};

pub const DEFAULT_MATCH_DURATION_MINUTES: i64 = 90;

static LADDER_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/pointscore/(\d+/\d+)").expect("static ladder regex"));

fn default_true() -> bool {
    true
}

/// One followed team/competition. Read-only input to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub name: String,
    /// Fixture URL (or bare `<competition>/<team>` id) the raw calendar comes from.
    #[serde(alias = "fixture_url")]
    pub source_team_ref: String,
    #[serde(default, alias = "ladder_url")]
    pub ladder_ref: Option<String>,
    #[serde(default)]
    pub match_duration_minutes: Option<i64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub publish_targets: Vec<String>,
    #[serde(default = "default_true")]
    pub active: bool,
}

impl RosterEntry {
    pub fn new(name: &str, source_team_ref: &str) -> Self {
        Self {
            name: name.to_string(),
            source_team_ref: source_team_ref.to_string(),
            ladder_ref: None,
            match_duration_minutes: None,
            category: None,
            publish_targets: Vec::new(),
            active: true,
        }
    }

    /// Effective match length: the explicit value, else the default.
    pub fn duration_minutes(&self) -> i64 {
        self.match_duration_minutes
            .unwrap_or(DEFAULT_MATCH_DURATION_MINUTES)
    }

    /// File-name-safe form of the entry name.
    pub fn file_stem(&self) -> String {
        sanitize(&self.name, &[])
    }

    /// `<competition>/<team>` from a `.../games/team/<c>/<t>` fixture URL,
    /// or the reference unchanged when it is not such a URL.
    pub fn team_path(&self) -> String {
        let parts: Vec<&str> = self.source_team_ref.split('/').collect();
        if let Some(idx) = parts.iter().position(|p| *p == "team")
            && idx > 0
            && parts[idx - 1] == "games"
            && parts.len() > idx + 2
        {
            return format!("{}/{}", parts[idx + 1], parts[idx + 2]);
        }
        self.source_team_ref.clone()
    }

    /// `<season>/<grade>` pair embedded in the ladder URL, used for round links.
    pub fn competition_id(&self) -> Option<&str> {
        let ladder = self.ladder_ref.as_deref()?;
        LADDER_ID_RE
            .captures(ladder)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// Publish target ids, or a single name-derived target when none are set.
    pub fn targets(&self) -> Vec<String> {
        if self.publish_targets.is_empty() {
            vec![format!("{}_processed", self.file_stem())]
        } else {
            self.publish_targets.clone()
        }
    }

    pub fn classify(&self) -> Category {
        Category::of(&self.name)
    }
}

/// Replaces every ASCII char that is not alphanumeric (or in `keep`) with `_`.
pub fn sanitize(text: &str, keep: &[char]) -> String {
    text.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || keep.contains(&c) {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Report grouping, checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, strum::Display, Serialize)]
pub enum Category {
    Midweek,
    Juniors,
    Womens,
    Mens,
    Uncategorized,
}

impl Category {
    fn keywords(&self) -> &'static [&'static str] {
        match self {
            Category::Midweek => &[
                "midweek", "35+", "t1", "t2", "t3", "t4", "masters", "monday", "tuesday",
                "wednesday", "thursday", "friday",
            ],
            Category::Juniors => &[
                "u12", "u14", "u16", "u18", "under 12", "under 14", "under 16", "under 18",
                "mixed", "girls",
            ],
            Category::Womens => &["women's", "women ", "womens"],
            Category::Mens => &["men's", "men ", "mens"],
            Category::Uncategorized => &[],
        }
    }

    pub fn of(name: &str) -> Self {
        let lower = name.to_lowercase();
        Category::iter()
            .find(|c| c.keywords().iter().any(|k| lower.contains(k)))
            .unwrap_or(Category::Uncategorized)
    }
}

/// The whole `roster.toml` document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    #[serde(rename = "competition", default)]
    pub entries: Vec<RosterEntry>,
}

impl Roster {
    pub fn find_by_name(&self, name: &str) -> Option<&RosterEntry> {
        self.entries
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name))
    }

    pub fn active(&self) -> impl Iterator<Item = &RosterEntry> {
        self.entries.iter().filter(|e| e.active)
    }
}
