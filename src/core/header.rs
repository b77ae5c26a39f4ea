/// Scene header parsing: delimiter detection, scalar coercion, and the
/// line-level state machine that builds a [`PropertyTable`].
///
/// The header is a small YAML-like subset:
///
/// ```text
/// ---
/// id: cellar
/// bg: "cellar.png"
/// chars: [alice, bob]
/// set_flags:
///   - visited_cellar
/// actions:
/// - type: fade
///     duration: 500
/// ---
/// ```

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use crate::schema::property::{ActionRecord, PropertyTable, PropertyValue, Scalar};

/// Marker that opens and closes a header, and separates text blocks.
pub const DELIMITER: &str = "---";

/// The property whose list items are action records rather than strings.
pub const ACTIONS_KEY: &str = "actions";

/// Minimum indentation for a `key: value` line inside an action record.
const ACTION_FIELD_INDENT: usize = 4;

const QUOTES: &[char] = &['"', '\''];

static CLOSING_DELIMITER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n---\r?(?:\n|\z)").expect("closing delimiter pattern"));

/// Split a document into header source and body.
///
/// Returns `None` when the text does not open with the delimiter or when
/// no closing delimiter line follows.
pub fn split_header(text: &str) -> Option<(&str, &str)> {
    let rest = text.strip_prefix(DELIMITER)?;
    let close = CLOSING_DELIMITER.find(rest)?;
    Some((&rest[..close.start()], &rest[close.end()..]))
}

/// Parse the header of a document, returning its properties and the body
/// text that follows it. A missing or unclosed header yields an empty
/// table and the whole text as body.
pub fn parse_header(text: &str) -> (PropertyTable, &str) {
    match split_header(text) {
        Some((source, body)) => (parse_header_source(source), body),
        None => (PropertyTable::new(), text),
    }
}

/// Parse header source (the text between the delimiters).
pub fn parse_header_source(source: &str) -> PropertyTable {
    source
        .lines()
        .fold(HeaderParser::new(), HeaderParser::feed)
        .finish()
}

/// Coerce a raw value: digit-only → integer, `true`/`false` (any case) →
/// boolean, anything else stays a string.
pub fn coerce_scalar(raw: &str) -> Scalar {
    if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(n) = raw.parse::<i64>() {
            return Scalar::Int(n);
        }
    }
    if raw.eq_ignore_ascii_case("true") {
        Scalar::Bool(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Scalar::Bool(false)
    } else {
        Scalar::Str(raw.to_string())
    }
}

/// Where the header parser is between lines.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HeaderState {
    #[default]
    TopLevel,
    /// Appending `- item` lines to the named list property.
    InList(String),
    /// After `actions:`, before the first `- type:` line.
    InActions,
    /// Filling in fields of an action record.
    InAction(ActionRecord),
}

/// Single forward pass over header lines.
#[derive(Debug, Clone, Default)]
pub struct HeaderParser {
    state: HeaderState,
    properties: PropertyTable,
    actions: Vec<ActionRecord>,
}

impl HeaderParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &HeaderState {
        &self.state
    }

    /// Consume one line and return the advanced parser.
    pub fn feed(mut self, line: &str) -> Self {
        let stripped = line.trim();
        if stripped.is_empty() {
            return self;
        }
        let indent = indentation(line);

        if matches!(self.state, HeaderState::InActions | HeaderState::InAction(_)) {
            if let Some(kind) = stripped.strip_prefix("- type:") {
                self.finish_action();
                self.state = HeaderState::InAction(ActionRecord::new(kind.trim()));
                return self;
            }
        }

        if let HeaderState::InAction(record) = &mut self.state {
            if indent >= ACTION_FIELD_INDENT {
                if let Some((key, value)) = split_pair(stripped) {
                    record.set(key, coerce_scalar(value));
                    return self;
                }
            }
        }

        if let HeaderState::InList(key) = &self.state {
            if let Some(item) = stripped.strip_prefix("- ") {
                let item = strip_matching_quotes(item.trim()).to_string();
                if let Some(PropertyValue::List(items)) = self.properties.get_mut(key) {
                    items.push(item);
                }
                return self;
            }
        }

        if indent == 0 {
            if let Some((key, value)) = split_pair(stripped) {
                self.finish_action();
                self.state = self.begin_property(key, value);
                return self;
            }
        }

        trace!(line = stripped, "skipping unrecognized header line");
        self
    }

    /// Flush any in-progress action record and return the properties.
    pub fn finish(mut self) -> PropertyTable {
        self.finish_action();
        if !self.actions.is_empty() {
            self.properties
                .insert(ACTIONS_KEY, PropertyValue::Actions(self.actions));
        }
        self.properties
    }

    fn finish_action(&mut self) {
        if matches!(self.state, HeaderState::InAction(_)) {
            if let HeaderState::InAction(record) =
                std::mem::replace(&mut self.state, HeaderState::InActions)
            {
                self.actions.push(record);
            }
        }
    }

    fn begin_property(&mut self, key: &str, value: &str) -> HeaderState {
        if !value.is_empty() {
            self.properties.insert(key, top_level_value(value));
            return HeaderState::TopLevel;
        }
        if key == ACTIONS_KEY {
            return HeaderState::InActions;
        }
        self.properties.insert(key, PropertyValue::List(Vec::new()));
        HeaderState::InList(key.to_string())
    }
}

fn top_level_value(value: &str) -> PropertyValue {
    if let Some(items) = parse_inline_list(value) {
        return PropertyValue::List(items);
    }
    match coerce_scalar(value) {
        Scalar::Str(_) => Scalar::Str(value.trim_matches(QUOTES).to_string()).into(),
        other => other.into(),
    }
}

fn parse_inline_list(value: &str) -> Option<Vec<String>> {
    let inner = value.strip_prefix('[')?.strip_suffix(']')?;
    Some(
        inner
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(|item| item.trim_matches(QUOTES).to_string())
            .collect(),
    )
}

fn split_pair(line: &str) -> Option<(&str, &str)> {
    line.split_once(':')
        .map(|(key, value)| (key.trim(), value.trim()))
}

fn strip_matching_quotes(item: &str) -> &str {
    for quote in QUOTES {
        if item.len() >= 2 && item.starts_with(*quote) && item.ends_with(*quote) {
            return &item[1..item.len() - 1];
        }
    }
    item
}

fn indentation(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(value: &str) -> PropertyValue {
        PropertyValue::Scalar(Scalar::from(value))
    }

    fn list(items: &[&str]) -> PropertyValue {
        PropertyValue::List(items.iter().map(|i| i.to_string()).collect())
    }

    #[test]
    fn no_opening_delimiter() {
        let text = "Just prose.\n---\nMore prose.";
        let (props, body) = parse_header(text);
        assert!(props.is_empty());
        assert_eq!(body, text);
    }

    #[test]
    fn unclosed_header_is_body() {
        let text = "---\nid: lost\nbg: void.png\n";
        let (props, body) = parse_header(text);
        assert!(props.is_empty());
        assert_eq!(body, text);
    }

    #[test]
    fn split_header_and_body() {
        let (header, body) = split_header("---\nid: intro\n---\nOnce upon a time.").unwrap();
        assert_eq!(header, "\nid: intro");
        assert_eq!(body, "Once upon a time.");
    }

    #[test]
    fn closing_delimiter_at_end_of_text() {
        let (header, body) = split_header("---\nid: intro\n---").unwrap();
        assert_eq!(header, "\nid: intro");
        assert_eq!(body, "");
    }

    #[test]
    fn closing_delimiter_must_be_whole_line() {
        let text = "---\nid: intro\n----\nstill header?";
        assert!(split_header(text).is_none());
    }

    #[test]
    fn crlf_header() {
        let (props, body) = parse_header("---\r\nid: intro\r\nbg: hall.png\r\n---\r\nText.");
        assert_eq!(props.get("id"), Some(&s("intro")));
        assert_eq!(props.get("bg"), Some(&s("hall.png")));
        assert_eq!(body, "Text.");
    }

    #[test]
    fn coerce_rules() {
        assert_eq!(coerce_scalar("500"), Scalar::Int(500));
        assert_eq!(coerce_scalar("007"), Scalar::Int(7));
        assert_eq!(coerce_scalar("TRUE"), Scalar::Bool(true));
        assert_eq!(coerce_scalar("False"), Scalar::Bool(false));
        assert_eq!(coerce_scalar("-3"), Scalar::from("-3"));
        assert_eq!(coerce_scalar("1.5"), Scalar::from("1.5"));
        assert_eq!(coerce_scalar(""), Scalar::from(""));
        assert_eq!(coerce_scalar("\"quoted\""), Scalar::from("\"quoted\""));
    }

    #[test]
    fn coerce_overflow_stays_string() {
        let huge = "99999999999999999999999";
        assert_eq!(coerce_scalar(huge), Scalar::from(huge));
    }

    #[test]
    fn top_level_scalars() {
        let props = parse_header_source("id: intro\nchapter: 3\nfinal: true\nbg: \"hall.png\"\nmusic: 'theme'");
        assert_eq!(props.get("id"), Some(&s("intro")));
        assert_eq!(props.get("chapter"), Some(&PropertyValue::Scalar(Scalar::Int(3))));
        assert_eq!(props.get("final"), Some(&PropertyValue::Scalar(Scalar::Bool(true))));
        assert_eq!(props.get("bg"), Some(&s("hall.png")));
        assert_eq!(props.get("music"), Some(&s("theme")));
    }

    #[test]
    fn value_split_at_first_colon() {
        let props = parse_header_source("bg: https://example.com/a.png");
        assert_eq!(props.get("bg"), Some(&s("https://example.com/a.png")));
    }

    #[test]
    fn block_list() {
        let props = parse_header_source("chars:\n  - alice\n  - \"bob\"\n  - 'carol'\nbg: hall");
        assert_eq!(props.get("chars"), Some(&list(&["alice", "bob", "carol"])));
        assert_eq!(props.get("bg"), Some(&s("hall")));
    }

    #[test]
    fn block_list_strips_one_quote_layer() {
        let props = parse_header_source("chars:\n- \"'alice'\"\n- \"bob'");
        assert_eq!(props.get("chars"), Some(&list(&["'alice'", "\"bob'"])));
    }

    #[test]
    fn empty_block_list_is_kept_in_table() {
        let props = parse_header_source("set_flags:\nbg: hall");
        assert_eq!(props.get("set_flags"), Some(&list(&[])));
    }

    #[test]
    fn inline_list() {
        let props = parse_header_source("chars: [alice, \"bob\", 'carol', ]");
        assert_eq!(props.get("chars"), Some(&list(&["alice", "bob", "carol"])));
    }

    #[test]
    fn inline_list_items_stay_strings() {
        let props = parse_header_source("ids: [1, true]");
        assert_eq!(props.get("ids"), Some(&list(&["1", "true"])));
    }

    #[test]
    fn action_grouping() {
        let props = parse_header_source(
            "actions:\n- type: fade\n    duration: 500\n- type: sound\n    volume: true",
        );
        let actions = props.get("actions").and_then(PropertyValue::as_actions).unwrap();
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].kind(), &Scalar::from("fade"));
        assert_eq!(actions[0].get("duration"), Some(&Scalar::Int(500)));
        assert_eq!(actions[1].kind(), &Scalar::from("sound"));
        assert_eq!(actions[1].get("volume"), Some(&Scalar::Bool(true)));
    }

    #[test]
    fn action_values_keep_quotes() {
        let props = parse_header_source("actions:\n  - type: say\n      text: \"hi\"");
        let actions = props.get("actions").and_then(PropertyValue::as_actions).unwrap();
        assert_eq!(actions[0].get("text"), Some(&Scalar::from("\"hi\"")));
    }

    #[test]
    fn shallow_action_field_is_ignored() {
        let props = parse_header_source("actions:\n- type: fade\n  duration: 500");
        let actions = props.get("actions").and_then(PropertyValue::as_actions).unwrap();
        assert_eq!(actions[0].get("duration"), None);
    }

    #[test]
    fn action_finalized_by_next_property() {
        let props = parse_header_source("actions:\n- type: shake\n    strength: 2\nbg: hall");
        let actions = props.get("actions").and_then(PropertyValue::as_actions).unwrap();
        assert_eq!(actions.len(), 1);
        assert_eq!(props.get("bg"), Some(&s("hall")));
    }

    #[test]
    fn actions_blocks_accumulate() {
        let props = parse_header_source("actions:\n- type: fade\nbg: hall\nactions:\n- type: sound");
        let actions = props.get("actions").and_then(PropertyValue::as_actions).unwrap();
        let kinds: Vec<&Scalar> = actions.iter().map(ActionRecord::kind).collect();
        assert_eq!(kinds, vec![&Scalar::from("fade"), &Scalar::from("sound")]);
    }

    #[test]
    fn empty_actions_block_is_absent() {
        let props = parse_header_source("actions:\nbg: hall");
        assert!(!props.contains_key("actions"));
    }

    #[test]
    fn type_line_outside_actions_is_list_item() {
        let props = parse_header_source("chars:\n- type: ghost");
        assert_eq!(props.get("chars"), Some(&list(&["type: ghost"])));
    }

    #[test]
    fn repeated_scalar_key_overwrites() {
        let props = parse_header_source("id: first\nbg: hall\nid: second");
        assert_eq!(props.get("id"), Some(&s("second")));
        let keys: Vec<&str> = props.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["id", "bg"]);
    }

    #[test]
    fn unrecognized_lines_are_skipped() {
        let props = parse_header_source("# comment\n  indented: ignored\nid: intro\nstray words");
        assert_eq!(props.len(), 1);
        assert_eq!(props.get("id"), Some(&s("intro")));
    }

    #[test]
    fn state_transitions() {
        let parser = HeaderParser::new();
        assert_eq!(parser.state(), &HeaderState::TopLevel);

        let parser = parser.feed("chars:");
        assert_eq!(parser.state(), &HeaderState::InList("chars".to_string()));

        let parser = parser.feed("  - alice").feed("");
        assert_eq!(parser.state(), &HeaderState::InList("chars".to_string()));

        let parser = parser.feed("actions:");
        assert_eq!(parser.state(), &HeaderState::InActions);

        let parser = parser.feed("- type: fade");
        assert_eq!(parser.state(), &HeaderState::InAction(ActionRecord::new("fade")));

        let parser = parser.feed("id: intro");
        assert_eq!(parser.state(), &HeaderState::TopLevel);

        let props = parser.finish();
        assert_eq!(props.get("chars"), Some(&list(&["alice"])));
        assert_eq!(props.get("actions").and_then(PropertyValue::as_actions).map(<[_]>::len), Some(1));
    }

    #[test]
    fn inline_actions_value_stays_scalar() {
        let parser = HeaderParser::new().feed("actions: none");
        assert_eq!(parser.state(), &HeaderState::TopLevel);
        let props = parser.feed("- type: fade").finish();
        assert_eq!(props.get("actions"), Some(&s("none")));
    }
}
