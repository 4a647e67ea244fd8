// File: src/rewrite/rules.rs
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::fmt;

/// Pipeline stage a rule belongs to. Stages run in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Club,
    Competition,
    Round,
}

impl Stage {
    pub const ORDERED: [Stage; 3] = [Stage::Club, Stage::Competition, Stage::Round];
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Club => write!(f, "club"),
            Stage::Competition => write!(f, "competition"),
            Stage::Round => write!(f, "round"),
        }
    }
}

/// One compiled substitution.
#[derive(Debug, Clone)]
pub enum Rule {
    /// Literal club name → short code. Group 1 of `pattern` is an optional
    /// team-number suffix that is re-attached as `"<code> <suffix>"`.
    Club { pattern: Regex, code: String },
    /// Concrete competition pattern (tokens already expanded).
    Competition {
        pattern: Regex,
        replacement: String,
        duration: Option<i64>,
    },
    Round { pattern: Regex, replacement: String },
}

impl Rule {
    /// Builds a club rule matching `name` literally, bounded on word edges.
    pub fn club(name: &str, code: &str) -> Result<Self, regex::Error> {
        let lead = if name.starts_with(|c: char| c.is_alphanumeric()) {
            r"\b"
        } else {
            ""
        };
        let tail = if name.ends_with(|c: char| c.is_alphanumeric()) {
            r"\b"
        } else {
            ""
        };
        let source = format!(
            r"{}{}{}(?:\s+([[:alnum:]]+)\b)?",
            lead,
            regex::escape(name),
            tail
        );
        Ok(Rule::Club {
            pattern: Regex::new(&source)?,
            code: code.to_string(),
        })
    }

    pub fn stage(&self) -> Stage {
        match self {
            Rule::Club { .. } => Stage::Club,
            Rule::Competition { .. } => Stage::Competition,
            Rule::Round { .. } => Stage::Round,
        }
    }

    pub fn pattern(&self) -> &Regex {
        match self {
            Rule::Club { pattern, .. }
            | Rule::Competition { pattern, .. }
            | Rule::Round { pattern, .. } => pattern,
        }
    }

    pub fn duration(&self) -> Option<i64> {
        match self {
            Rule::Competition { duration, .. } => *duration,
            _ => None,
        }
    }

    /// Applies the rule to every match in `text`.
    pub fn apply<'t>(&self, text: &'t str) -> Cow<'t, str> {
        match self {
            Rule::Club { pattern, code } => {
                pattern.replace_all(text, |caps: &Captures| match caps.get(1) {
                    Some(suffix) => format!("{} {}", code, suffix.as_str()),
                    None => code.clone(),
                })
            }
            Rule::Competition {
                pattern,
                replacement,
                ..
            }
            | Rule::Round {
                pattern,
                replacement,
            } => pattern.replace_all(text, replacement.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_club_rule_keeps_team_suffix() {
        let rule = Rule::club("Riverside Hockey Club", "RHC").unwrap();
        assert_eq!(
            rule.apply("Riverside Hockey Club 2 v Example Hockey Club 1"),
            "RHC 2 v Example Hockey Club 1"
        );
        assert_eq!(rule.apply("Riverside Hockey Club  3"), "RHC 3");
        assert_eq!(rule.apply("Riverside Hockey Club"), "RHC");
    }

    #[test]
    fn test_club_rule_is_literal() {
        // Dots and parentheses in club names are not regex syntax.
        let rule = Rule::club("St. Kilda (Hockey) Club", "SKHC").unwrap();
        assert_eq!(rule.apply("St. Kilda (Hockey) Club 1 v X"), "SKHC 1 v X");
        assert_eq!(rule.apply("StX Kilda (Hockey) Club 1"), "StX Kilda (Hockey) Club 1");
    }

    #[test]
    fn test_club_rule_respects_word_edges() {
        let rule = Rule::club("Hawks", "HWK").unwrap();
        assert_eq!(rule.apply("Nighthawks 2 v Hawks 1"), "Nighthawks 2 v HWK 1");
    }

    #[test]
    fn test_round_rule_capture_reference() {
        let rule = Rule::Round {
            pattern: Regex::new(r"Round (\d+)").unwrap(),
            replacement: "R$1".to_string(),
        };
        assert_eq!(rule.apply("PenA Round 7 - A v B"), "PenA R7 - A v B");
        assert_eq!(rule.stage(), Stage::Round);
    }
}
