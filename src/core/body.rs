/// Scene body parsing: narrative text blocks and the choices section.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::choice::parse_choices;
use crate::core::header::DELIMITER;
use crate::schema::scene::Choice;

static CHOICES_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^###[ \t]*Choices[ \t]*\r?$").expect("choices heading pattern"));

/// Split a body at its `### Choices` heading.
///
/// Returns the narrative text and, when the heading exists, the text after
/// the heading line.
pub fn split_choices_section(body: &str) -> (&str, Option<&str>) {
    match CHOICES_HEADING.find(body) {
        Some(heading) => (&body[..heading.start()], Some(&body[heading.end()..])),
        None => (body, None),
    }
}

/// Split narrative text into trimmed, non-empty blocks separated by `---` lines.
pub fn split_text_blocks(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line == DELIMITER {
            push_block(&mut blocks, &current);
            current.clear();
        } else {
            current.push(line);
        }
    }
    push_block(&mut blocks, &current);

    blocks
}

fn push_block(blocks: &mut Vec<String>, lines: &[&str]) {
    let block = lines.join("\n");
    let block = block.trim();
    if !block.is_empty() {
        blocks.push(block.to_string());
    }
}

/// Parse a body into text blocks and choices.
pub fn parse_body(body: &str) -> (Vec<String>, Vec<Choice>) {
    let (narrative, choices) = split_choices_section(body);
    let choices = choices.map(parse_choices).unwrap_or_default();
    (split_text_blocks(narrative), choices)
}
