// File: ./src/rewrite/mod.rs
/*! Layered title rewriting.

Rule tables are plain data loaded by the application (see `config`). They are
compiled once into a [`RuleSet`] for a given year and then shared read-only
across every `transcode` call. Stage order is fixed: club names, competition
templates, round labels, then gender-prefix inference. Competition templates
may introduce text the round patterns match, so the order matters.
*/

pub mod gender;
pub mod rules;

pub use gender::Gender;
pub use rules::{Rule, Stage};

use crate::error::RuleError;
use chrono::{Datelike, Local};
use regex::Regex;
use serde::{Deserialize, Serialize};

const YEAR_TOKEN: &str = "{{YEAR}}";
const GENDER_TOKEN: &str = "{{GENDER}}";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClubMapping {
    pub name: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitionTemplate {
    pub pattern: String,
    pub replacement: String,
    /// Match length override in minutes for competitions this template matches.
    #[serde(default)]
    pub duration: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundPattern {
    pub regex: String,
    pub replacement: String,
}

/// Raw rule tables as stored in `rules.toml`. Order of every list is significant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleTables {
    #[serde(rename = "club", default)]
    pub clubs: Vec<ClubMapping>,
    #[serde(rename = "competition", default)]
    pub competitions: Vec<CompetitionTemplate>,
    #[serde(rename = "round", default)]
    pub rounds: Vec<RoundPattern>,
}

/// Compiled, immutable rewrite pipeline.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
    year: i32,
}

fn compile_regex(stage: &'static str, source: &str) -> Result<Regex, RuleError> {
    Regex::new(source).map_err(|source_err| RuleError::InvalidPattern {
        stage,
        pattern: source.to_string(),
        source: source_err,
    })
}

impl RuleSet {
    /// Compiles `tables`, expanding `{{YEAR}}` to `year` and `{{GENDER}}` into
    /// one rule per gender.
    pub fn compile(tables: &RuleTables, year: i32) -> Result<Self, RuleError> {
        let mut rules = Vec::with_capacity(
            tables.clubs.len() + tables.competitions.len() * 2 + tables.rounds.len(),
        );

        for club in &tables.clubs {
            let rule =
                Rule::club(&club.name, &club.code).map_err(|e| RuleError::InvalidPattern {
                    stage: "club",
                    pattern: club.name.clone(),
                    source: e,
                })?;
            rules.push(rule);
        }

        let year_str = year.to_string();
        for template in &tables.competitions {
            let pattern = template.pattern.replace(YEAR_TOKEN, &year_str);
            let replacement = template.replacement.replace(YEAR_TOKEN, &year_str);

            if pattern.contains(GENDER_TOKEN) {
                for (pattern_word, replacement_word) in [("Men's", "Men"), ("Women's", "Women")] {
                    rules.push(Rule::Competition {
                        pattern: compile_regex(
                            "competition",
                            &pattern.replace(GENDER_TOKEN, pattern_word),
                        )?,
                        replacement: replacement.replace(GENDER_TOKEN, replacement_word),
                        duration: template.duration,
                    });
                }
            } else {
                rules.push(Rule::Competition {
                    pattern: compile_regex("competition", &pattern)?,
                    replacement,
                    duration: template.duration,
                });
            }
        }

        for round in &tables.rounds {
            rules.push(Rule::Round {
                pattern: compile_regex("round", &round.regex)?,
                replacement: round.replacement.clone(),
            });
        }

        // Stable sort keeps table order inside each stage.
        rules.sort_by_key(Rule::stage);

        Ok(Self { rules, year })
    }

    pub fn compile_for_current_year(tables: &RuleTables) -> Result<Self, RuleError> {
        Self::compile(tables, Local::now().year())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    fn stage_rules(&self, stage: Stage) -> impl Iterator<Item = &Rule> {
        self.rules.iter().filter(move |r| r.stage() == stage)
    }

    /// Rewrites an event title. Pure apart from warning logs for titles no
    /// club or competition mapping recognised.
    pub fn rewrite(&self, title: &str) -> String {
        let original = normalize_whitespace(title);
        let mut text = original.clone();

        for stage in Stage::ORDERED {
            let before = text.clone();
            let mut any_rules = false;
            for rule in self.stage_rules(stage) {
                any_rules = true;
                text = rule.apply(&text).into_owned();
            }
            if any_rules && stage != Stage::Round && text == before {
                log::warn!("No {} name mapping found for: \"{}\"", stage, original);
            }
        }

        let text = gender::apply_prefix(&normalize_whitespace(&text), &original);
        normalize_whitespace(&text)
    }

    /// Duration override of the first competition template matching `title`.
    pub fn duration_for(&self, title: &str) -> Option<i64> {
        self.stage_rules(Stage::Competition)
            .filter(|r| r.duration().is_some())
            .find(|r| r.pattern().is_match(title))
            .and_then(Rule::duration)
    }
}

/// Collapses whitespace runs (including folded-line remnants) to single spaces.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
