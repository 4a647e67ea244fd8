// File: ./src/round.rs
// Decides whether an event title is a numbered round, a finals stage, or neither.
use once_cell::sync::Lazy;
use regex::Regex;
use strum::{EnumIter, IntoEnumIterator};

// Word-bounded so age groups ("Under 12") and codes ("U14R2") never match.
static ROUND_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:round|rd)\s+(\d+)\b").expect("static round regex")
});

/// Finals stages, in the order they are played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, strum::Display)]
pub enum FinalsStage {
    #[strum(to_string = "Elimination Final")]
    Elimination,
    #[strum(to_string = "Semi Final")]
    Semi,
    #[strum(to_string = "Preliminary Final")]
    Preliminary,
    #[strum(to_string = "Grand Final")]
    Grand,
}

impl FinalsStage {
    /// First finals stage named in `title`, case-insensitive.
    pub fn find_in(title: &str) -> Option<Self> {
        let lower = title.to_lowercase();
        FinalsStage::iter().find(|stage| lower.contains(&stage.to_string().to_lowercase()))
    }
}

fn regular_round_number(title: &str) -> Option<u32> {
    ROUND_RE
        .captures(title)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
}

/// Round number for the "current round" link, or `None` for finals and
/// unrecognised titles.
///
/// `_max_regular_round_seen` comes from the document pre-pass
/// ([`max_regular_round`]). It does not change the answer for a single event.
pub fn classify_round(title: &str, _max_regular_round_seen: u32) -> Option<u32> {
    if let Some(round) = regular_round_number(title) {
        return Some(round);
    }

    if let Some(stage) = FinalsStage::find_in(title) {
        log::debug!("'{}' is a finals fixture ({}), no round link", title, stage);
    }
    None
}

/// Highest numbered regular round across all titles of one document (0 if none).
pub fn max_regular_round<'a, I>(titles: I) -> u32
where
    I: IntoIterator<Item = &'a str>,
{
    titles
        .into_iter()
        .filter_map(regular_round_number)
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_round() {
        assert_eq!(
            classify_round("Men's Hockey - Round 5 - Club A v Club B", 0),
            Some(5)
        );
        assert_eq!(classify_round("PenA Rd 12 - RHC 2 v EHC", 0), Some(12));
        assert_eq!(classify_round("round 3", 0), Some(3));
    }

    #[test]
    fn test_finals_have_no_round() {
        assert_eq!(classify_round("Pennant A - Grand Final - RHC v EHC", 18), None);
        assert_eq!(classify_round("SEMI FINAL 1", 18), None);
        assert_eq!(
            FinalsStage::find_in("Preliminary Final - A v B"),
            Some(FinalsStage::Preliminary)
        );
    }

    #[test]
    fn test_age_group_digits_are_not_rounds() {
        assert_eq!(classify_round("Under 12 Boys - Club A v Club B", 0), None);
        assert_eq!(classify_round("U14 Girls R2 - A v B", 0), None);
        assert_eq!(classify_round("Third Round Robin", 0), None);
    }

    #[test]
    fn test_max_regular_round() {
        let titles = [
            "PenA - Round 1 - A v B",
            "PenA - Round 14 - A v C",
            "PenA - Semi Final - A v D",
            "Under 16 - A v E",
        ];
        assert_eq!(max_regular_round(titles.iter().copied()), 14);
        assert_eq!(max_regular_round(std::iter::empty::<&str>()), 0);
    }
}
