// File: src/rewrite/gender.rs
// Final rewrite stage: prefix ambiguous competition codes with the gender
// found in the untouched source title.
use once_cell::sync::Lazy;
use regex::Regex;

static WOMEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:women'?s?|girls?|ladies)\b").expect("static women regex")
});

// `\bmen` can never match inside "women": there is no word edge before "men".
static MEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:men'?s?|boys?)\b").expect("static men regex"));

static INDOOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i:indoor)\s+(?:(?i:league)\s+)?(\d+)\b").expect("static indoor regex")
});

// Short league codes such as "PL", "PenA", "VL1", "MPL".
static SHORT_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][A-Za-z0-9]{1,3}\b").expect("static code regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Gender {
    Women,
    Men,
}

impl Gender {
    /// Women markers win: "Men's & Women's" events are uncommon, girls' grades are not.
    pub fn detect(text: &str) -> Option<Self> {
        if WOMEN_RE.is_match(text) {
            Some(Gender::Women)
        } else if MEN_RE.is_match(text) {
            Some(Gender::Men)
        } else {
            None
        }
    }
}

fn has_gender_marker(text: &str) -> bool {
    WOMEN_RE.is_match(text) || MEN_RE.is_match(text)
}

/// Normalises a leading "Indoor N" label to "Indoor League N".
fn normalize_indoor(text: &str) -> Option<String> {
    let caps = INDOOR_RE.captures(text)?;
    let whole = caps.get(0)?;
    let number = caps.get(1)?.as_str();
    Some(format!("Indoor League {}{}", number, &text[whole.end()..]))
}

/// Prepends the gender detected in `original` when `rewritten` starts with
/// an ambiguous code and carries no gender word of its own.
pub fn apply_prefix(rewritten: &str, original: &str) -> String {
    let (text, ambiguous) = match normalize_indoor(rewritten) {
        Some(indoor) => (indoor, true),
        None => (rewritten.to_string(), SHORT_CODE_RE.is_match(rewritten)),
    };

    if !ambiguous || has_gender_marker(&text) {
        return text;
    }

    match Gender::detect(original) {
        Some(gender) => format!("{} {}", gender, text),
        None => text,
    }
}
