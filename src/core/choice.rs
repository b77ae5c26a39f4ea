/// Choice-line grammar.
///
/// ```text
/// - Open the door (requires: has_key, !alarmed) (sets: door_open) → hallway
/// - Walk away -> street
/// ```
///
/// Each line is `- <label> <arrow> <target>`, where the arrow is `→` or
/// `->` and the label may carry `(requires: …)` and `(sets: …)`
/// annotations in any order.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::schema::scene::Choice;

const UNICODE_ARROW: &str = "→";
const ASCII_ARROW: &str = "->";

static REQUIRES_ANNOTATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(requires:\s*([^)]+)\)").expect("requires annotation pattern"));
static SETS_ANNOTATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(sets:\s*([^)]+)\)").expect("sets annotation pattern"));

/// Parse every `-` line of a choices section. Lines that don't match the
/// grammar are dropped.
pub fn parse_choices(section: &str) -> Vec<Choice> {
    section
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with('-'))
        .filter_map(parse_choice_line)
        .collect()
}

/// Parse a single choice line.
pub fn parse_choice_line(line: &str) -> Option<Choice> {
    let line = line.trim();
    let rest = line.strip_prefix('-')?.trim();

    let Some((label_region, target)) = split_arrow(rest) else {
        debug!(line, "dropping choice without an arrow");
        return None;
    };

    let (label_region, require_flags) = extract_annotation(label_region, &REQUIRES_ANNOTATION);
    let (label_region, set_flags) = extract_annotation(&label_region, &SETS_ANNOTATION);

    let label = label_region.trim();
    if label.is_empty() || target.is_empty() {
        debug!(line, "dropping choice with an empty label or target");
        return None;
    }

    Some(Choice {
        label: label.to_string(),
        target: target.to_string(),
        require_flags,
        set_flags,
    })
}

/// Split at the first arrow into `(label region, target)`, both trimmed.
///
/// A `→` anywhere in the line wins over `->`.
pub fn split_arrow(line: &str) -> Option<(&str, &str)> {
    let arrow = if line.contains(UNICODE_ARROW) {
        UNICODE_ARROW
    } else {
        ASCII_ARROW
    };
    line.split_once(arrow)
        .map(|(label, target)| (label.trim(), target.trim()))
}

/// Capture the flag list of the first match of `pattern` and remove every
/// match from the label region.
pub fn extract_annotation(label: &str, pattern: &Regex) -> (String, Option<Vec<String>>) {
    let Some(captures) = pattern.captures(label) else {
        return (label.to_string(), None);
    };
    let flags: Vec<String> = captures[1]
        .split(',')
        .map(str::trim)
        .filter(|flag| !flag.is_empty())
        .map(str::to_string)
        .collect();
    let stripped = pattern.replace_all(label, "").trim().to_string();
    // An annotation with no flags is still removed from the label.
    (stripped, (!flags.is_empty()).then_some(flags))
}
