// File: src/model/tags.rs
//! Summary post-processing: inline description, `key:value` tags, `+project`
//! and `@context` markers. Each stage removes the spans it consumed before the
//! next one runs, so a token is never extracted twice.
use crate::model::parser::{Diagnostic, ParseError, Rejection, parse_date, parse_status};
use crate::model::{DateType, TaskStatus};
use once_cell::sync::Lazy;
use regex::Regex;

static DESCRIPTION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s//(?:\s+(?P<text>.*))?$")
        .unwrap_or_else(|e| panic!("Invalid description regex: {e}"))
});

static TAG_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s(?P<key>[^\s:]+):(?P<value>\S+)")
        .unwrap_or_else(|e| panic!("Invalid tag regex: {e}"))
});

static PROJECT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s\+(?P<word>\w+)").unwrap_or_else(|e| panic!("Invalid project regex: {e}"))
});

static CONTEXT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s@(?P<word>\w+)").unwrap_or_else(|e| panic!("Invalid context regex: {e}"))
});

/// Tag names understood in `key:value` tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    Created,
    Completed,
    Status,
    Due,
    Start,
    Dtstamp,
    Location,
    Categories,
}

impl TagKind {
    pub const ALL: [TagKind; 8] = [
        TagKind::Created,
        TagKind::Completed,
        TagKind::Status,
        TagKind::Due,
        TagKind::Start,
        TagKind::Dtstamp,
        TagKind::Location,
        TagKind::Categories,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TagKind::Created => "created",
            TagKind::Completed => "completed",
            TagKind::Status => "status",
            TagKind::Due => "due",
            TagKind::Start => "start",
            TagKind::Dtstamp => "dtstamp",
            TagKind::Location => "location",
            TagKind::Categories => "categories",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(key))
    }

    /// Converter used for this tag's raw value.
    pub fn converter(&self) -> fn(&str) -> Result<TagValue, ParseError> {
        match self {
            TagKind::Created
            | TagKind::Completed
            | TagKind::Due
            | TagKind::Start
            | TagKind::Dtstamp => convert_date,
            TagKind::Status => convert_status,
            TagKind::Location => convert_text,
            TagKind::Categories => convert_list,
        }
    }

    pub fn parse(&self, value: &str) -> Result<TagValue, ParseError> {
        (self.converter())(value)
    }
}

fn convert_date(value: &str) -> Result<TagValue, ParseError> {
    parse_date(value).map(TagValue::Date)
}

fn convert_status(value: &str) -> Result<TagValue, ParseError> {
    parse_status(value).map(TagValue::Status)
}

fn convert_text(value: &str) -> Result<TagValue, ParseError> {
    Ok(TagValue::Text(value.to_string()))
}

fn convert_list(value: &str) -> Result<TagValue, ParseError> {
    Ok(TagValue::List(
        value
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect(),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagValue {
    Date(DateType),
    Status(TaskStatus),
    Text(String),
    List(Vec<String>),
}

impl TagValue {
    /// An empty value does not count as a successful parse: the token stays in the summary.
    pub fn is_empty(&self) -> bool {
        match self {
            TagValue::Date(_) => false,
            TagValue::Status(s) => *s == TaskStatus::NeedsAction,
            TagValue::Text(s) => s.is_empty(),
            TagValue::List(items) => items.is_empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedTag {
    pub kind: TagKind,
    pub value: TagValue,
}

/// What is left of a line after the prefix grammar, split into its parts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Normalized {
    /// Applied tags in the order they appeared.
    pub tags: Vec<TypedTag>,
    pub categories: Vec<String>,
    pub resources: Vec<String>,
    pub description: Option<String>,
    pub summary: String,
}

/// Rebuilds `text` without the given sorted, non-overlapping byte ranges.
fn strip_spans(text: &str, spans: &[(usize, usize)]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for &(start, end) in spans {
        out.push_str(&text[cursor..start]);
        cursor = end;
    }
    out.push_str(&text[cursor..]);
    out
}

fn extract_description(working: &str) -> (Option<String>, String) {
    match DESCRIPTION_PATTERN.captures(working) {
        Some(caps) => {
            let Some(whole) = caps.get(0) else {
                return (None, working.to_string());
            };
            let description = caps
                .name("text")
                .map(|m| m.as_str().trim().to_string())
                .filter(|d| !d.is_empty());
            (description, working[..whole.start()].to_string())
        }
        None => (None, working.to_string()),
    }
}

fn extract_tags(
    working: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<(Vec<TypedTag>, String), Rejection> {
    let mut tags = Vec::new();
    let mut spans = Vec::new();

    for caps in TAG_PATTERN.captures_iter(working) {
        let (Some(whole), Some(key), Some(value)) =
            (caps.get(0), caps.name("key"), caps.name("value"))
        else {
            continue;
        };
        let (key, value) = (key.as_str(), value.as_str());

        // `scheme://...` is a link, not a tag.
        if value.starts_with("//") {
            continue;
        }

        let Some(kind) = TagKind::from_key(key) else {
            diagnostics.push(Diagnostic::UnknownTagKey {
                key: key.to_string(),
                value: value.to_string(),
            });
            continue;
        };

        match kind.parse(value) {
            Ok(parsed) if !parsed.is_empty() => {
                tags.push(TypedTag {
                    kind,
                    value: parsed,
                });
                spans.push((whole.start(), whole.end()));
            }
            Ok(_) => {}
            Err(ParseError::UnrecognizedStatus(s)) => {
                return Err(Rejection::UnrecognizedStatus(s));
            }
            Err(error) => diagnostics.push(Diagnostic::DroppedField {
                field: kind.name(),
                error,
            }),
        }
    }

    Ok((tags, strip_spans(working, &spans)))
}

fn extract_markers(working: &str, pattern: &Regex) -> (Vec<String>, String) {
    let mut words = Vec::new();
    let mut spans = Vec::new();

    for caps in pattern.captures_iter(working) {
        if let (Some(whole), Some(word)) = (caps.get(0), caps.name("word")) {
            words.push(word.as_str().to_string());
            spans.push((whole.start(), whole.end()));
        }
    }

    words.sort();
    words.dedup();
    (words, strip_spans(working, &spans))
}

/// Splits the remainder of a task line into typed tags, markers, an optional
/// description and the cleaned summary.
///
/// Unknown tag keys and unparseable tag dates are reported through
/// `diagnostics` and left in the summary. An unknown `status:` value rejects
/// the whole line.
pub fn normalize(
    remainder: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Normalized, Rejection> {
    // Leading space so that a token at the very start is matched like any other.
    let working = format!(" {}", remainder);

    let (description, working) = extract_description(&working);
    let (tags, working) = extract_tags(&working, diagnostics)?;
    let (categories, working) = extract_markers(&working, &PROJECT_PATTERN);
    let (resources, working) = extract_markers(&working, &CONTEXT_PATTERN);

    Ok(Normalized {
        tags,
        categories,
        resources,
        description,
        summary: working.trim().to_string(),
    })
}
