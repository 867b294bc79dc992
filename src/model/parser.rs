// File: src/model/parser.rs
//! Line classification: decides which task notation a line uses and pulls the
//! prefix fields (status, priority, completion/creation dates) out of it.
use crate::model::{DateType, TaskStatus};
use chrono::{NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use thiserror::Error;

const DATE: &str = r"[0-9]{4}-[0-9]{2}-[0-9]{2}(?:[Tt][0-9]{2}:[0-9]{2}(?::[0-9]{2})?)?";
// Priority and date pieces have to end on whitespace or at the end of the line.
const SEP: &str = r"(?:\s+|$)";
// A keyword only has to end on a word boundary; `:` or `-` glued to it is dropped.
const KEYWORD_END: &str = r"\b[:;,.\-]*\s*";

fn compile(name: &str, pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("Invalid {name} regex: {e}"))
}

static CHECKBOX_PATTERN: Lazy<Regex> = Lazy::new(|| {
    compile(
        "checkbox",
        &format!(
            r"(?i)^- \[(?P<status>[ x@~])\]\s*(?:\((?P<priority>[A-Z])\){SEP})?(?:(?:(?P<completed>{DATE}){SEP})?(?P<created>{DATE}){SEP})?"
        ),
    )
});

static KEYWORD_PATTERN: Lazy<Regex> = Lazy::new(|| {
    compile(
        "keyword",
        &format!(
            r"(?i)^- (?P<status>TODO|DONE|EXPIRED|CANCELL?ED|NEEDS-ACTION|COMPLETED|IN-PROCESS){KEYWORD_END}"
        ),
    )
});

static TODOTXT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    compile(
        "todo.txt",
        &format!(
            r"(?i)^- (?:(?P<status>x){SEP})?(?:\((?P<priority>[A-Z])\){SEP})?(?:(?:(?P<completed>{DATE}){SEP})?(?P<created>{DATE}){SEP})?"
        ),
    )
});

static DATE_PREFIX: Lazy<Regex> = Lazy::new(|| {
    compile(
        "date",
        r"^(?P<date>[0-9]{4}-[0-9]{2}-[0-9]{2})(?:[Tt](?P<time>[0-9]{2}:[0-9]{2}(?::[0-9]{2})?))?",
    )
});

/// Field-level conversion failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("status not recognized: {0:?}")]
    UnrecognizedStatus(String),
    #[error("not an ISO-8601 date or date-time: {0:?}")]
    UnparseableDate(String),
}

/// Why a line produced no task.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("line does not match any task notation")]
    NotATask,
    #[error("task marker without a summary")]
    EmptySummary,
    #[error("status not recognized: {0:?}")]
    UnrecognizedStatus(String),
}

/// Non-fatal findings reported next to a parse result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A `key:value` token whose key is not a known tag; left in the summary.
    UnknownTagKey { key: String, value: String },
    /// A field whose value could not be converted; the task is kept without it.
    DroppedField {
        field: &'static str,
        error: ParseError,
    },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::UnknownTagKey { key, value } => {
                write!(f, "unknown field {}:{} left in summary", key, value)
            }
            Diagnostic::DroppedField { field, error } => {
                write!(f, "dropped field '{}': {}", field, error)
            }
        }
    }
}

/// The three task notations, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grammar {
    /// `- [ ]`, `- [x]`, `- [@]`, `- [~]`
    Checkbox,
    /// `- TODO`, `- DONE`, `- CANCELLED`, ...
    Keyword,
    /// `- x (A) 2024-01-02 2024-01-01 ...`
    TodoTxt,
}

impl Grammar {
    pub const PRECEDENCE: [Grammar; 3] = [Grammar::Checkbox, Grammar::Keyword, Grammar::TodoTxt];

    fn pattern(&self) -> &'static Regex {
        match self {
            Grammar::Checkbox => &CHECKBOX_PATTERN,
            Grammar::Keyword => &KEYWORD_PATTERN,
            Grammar::TodoTxt => &TODOTXT_PATTERN,
        }
    }

    /// Matches the grammar's prefix and returns the captured fields together
    /// with the byte offset where the prefix ends.
    pub fn match_line(&self, line: &str) -> Option<(RawFieldSet, usize)> {
        let caps = self.pattern().captures(line)?;
        let end = caps.get(0)?.end();
        Some((RawFieldSet::from_captures(*self, &caps), end))
    }
}

/// Raw strings captured by the grammar that matched. Fields the grammar
/// does not define stay `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFieldSet {
    pub grammar: Grammar,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub completed: Option<String>,
    pub created: Option<String>,
}

impl RawFieldSet {
    fn from_captures(grammar: Grammar, caps: &Captures<'_>) -> Self {
        let field = |name: &str| caps.name(name).map(|m| m.as_str().to_string());
        Self {
            grammar,
            status: field("status"),
            priority: field("priority"),
            completed: field("completed"),
            created: field("created"),
        }
    }
}

/// Same as [`classify`], but says why a line was turned down.
pub fn classify_line(line: &str) -> Result<(RawFieldSet, &str), Rejection> {
    let (fields, end) = Grammar::PRECEDENCE
        .iter()
        .find_map(|grammar| grammar.match_line(line))
        .ok_or(Rejection::NotATask)?;

    let remainder = line[end..].trim();
    if remainder.is_empty() {
        return Err(Rejection::EmptySummary);
    }
    Ok((fields, remainder))
}

/// First matching grammar wins; no fields are merged across grammars.
pub fn classify(line: &str) -> Option<(RawFieldSet, &str)> {
    classify_line(line).ok()
}

pub fn parse_status(value: &str) -> Result<TaskStatus, ParseError> {
    // CANCELLED is surfaced as COMPLETED: several clients keep showing cancelled todos.
    match value.to_uppercase().as_str() {
        "CANCELLED" | "CANCELED" | "EXPIRED" | "DONE" | "COMPLETED" | "X" | "~" => {
            Ok(TaskStatus::Completed)
        }
        "TODO" | "NEEDS-ACTION" | " " => Ok(TaskStatus::NeedsAction),
        "@" | "IN-PROCESS" | "IN-PROGRESS" => Ok(TaskStatus::InProgress),
        _ => Err(ParseError::UnrecognizedStatus(value.to_string())),
    }
}

/// Parses the leading `YYYY-MM-DD[THH:MM[:SS]]` of `value`; trailing text is ignored.
pub fn parse_date(value: &str) -> Result<DateType, ParseError> {
    let invalid = || ParseError::UnparseableDate(value.to_string());
    let caps = DATE_PREFIX.captures(value).ok_or_else(invalid)?;

    let date_str = caps.name("date").ok_or_else(invalid)?.as_str();
    let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|_| invalid())?;

    match caps.name("time").map(|m| m.as_str()) {
        None => Ok(DateType::AllDay(date)),
        Some(t) => {
            let fmt = if t.len() > 5 { "%H:%M:%S" } else { "%H:%M" };
            let time = NaiveTime::parse_from_str(t, fmt).map_err(|_| invalid())?;
            Ok(DateType::Floating(date.and_time(time)))
        }
    }
}
