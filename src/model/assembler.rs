// File: src/model/assembler.rs
use crate::clock::{Clock, SystemClock};
use crate::model::parser::{
    Diagnostic, RawFieldSet, Rejection, classify_line, parse_date, parse_status,
};
use crate::model::tags::{Normalized, TagKind, TagValue, normalize};
use crate::model::{DateType, Task, TaskStatus};
use sha2::{Digest, Sha256};

/// Tasks in input line order. Identical lines yield identical uids; nothing is deduplicated.
pub type TaskCollection = Vec<Task>;

/// Outcome of one line plus everything worth telling the user about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseReport {
    pub outcome: Result<Task, Rejection>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseReport {
    pub fn task(&self) -> Option<&Task> {
        self.outcome.as_ref().ok()
    }

    pub fn into_task(self) -> Option<Task> {
        self.outcome.ok()
    }
}

/// Hex SHA-256 of the line exactly as given.
pub fn compute_uid(line: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(line.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn prefix_date(
    field: &'static str,
    raw: Option<&str>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<DateType> {
    match parse_date(raw?) {
        Ok(date) => Some(date),
        Err(error) => {
            diagnostics.push(Diagnostic::DroppedField { field, error });
            None
        }
    }
}

/// Merges classifier fields and normalizer output into a task.
///
/// Inline tags overwrite what the prefix grammar captured. The summary check
/// runs last, after every stripping stage.
pub fn assemble(
    line: &str,
    fields: RawFieldSet,
    normalized: Normalized,
    clock: &dyn Clock,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Task, Rejection> {
    let mut status = match fields.status.as_deref() {
        Some(raw) => {
            parse_status(raw).map_err(|_| Rejection::UnrecognizedStatus(raw.to_string()))?
        }
        None => TaskStatus::NeedsAction,
    };
    let priority = fields
        .priority
        .as_deref()
        .and_then(|p| p.chars().next())
        .map(|c| c.to_ascii_uppercase());

    let mut completed = prefix_date("completed", fields.completed.as_deref(), diagnostics);
    let mut created = prefix_date("created", fields.created.as_deref(), diagnostics);
    let mut due = None;
    let mut start = None;
    let mut dtstamp = None;
    let mut location = None;
    let mut categories = normalized.categories;

    for tag in normalized.tags {
        match (tag.kind, tag.value) {
            (TagKind::Created, TagValue::Date(d)) => created = Some(d),
            (TagKind::Completed, TagValue::Date(d)) => completed = Some(d),
            (TagKind::Due, TagValue::Date(d)) => due = Some(d),
            (TagKind::Start, TagValue::Date(d)) => start = Some(d),
            (TagKind::Dtstamp, TagValue::Date(d)) => dtstamp = Some(d),
            (TagKind::Status, TagValue::Status(s)) => status = s,
            (TagKind::Location, TagValue::Text(l)) => location = Some(l),
            (TagKind::Categories, TagValue::List(items)) => categories.extend(items),
            // Converters only ever produce the value kind of their tag.
            _ => {}
        }
    }
    categories.sort();
    categories.dedup();

    let summary = normalized.summary.trim();
    if summary.is_empty() {
        return Err(Rejection::EmptySummary);
    }

    Ok(Task {
        uid: compute_uid(line),
        summary: summary.to_string(),
        status,
        priority,
        description: normalized.description,
        created,
        completed,
        due,
        start,
        dtstamp: dtstamp.unwrap_or_else(|| DateType::Specific(clock.now())),
        categories,
        resources: normalized.resources,
        location,
    })
}

/// Stateless line parser; the clock only feeds the `dtstamp` default.
#[derive(Debug, Clone, Default)]
pub struct TaskParser<C: Clock = SystemClock> {
    clock: C,
}

impl<C: Clock> TaskParser<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    pub fn parse_line_report(&self, line: &str) -> ParseReport {
        let mut diagnostics = Vec::new();
        let outcome = classify_line(line).and_then(|(fields, remainder)| {
            let normalized = normalize(remainder, &mut diagnostics)?;
            assemble(line, fields, normalized, &self.clock, &mut diagnostics)
        });
        ParseReport {
            outcome,
            diagnostics,
        }
    }

    pub fn parse_line(&self, line: &str) -> Option<Task> {
        self.parse_line_report(line).into_task()
    }

    /// Lazily parses `lines`, skipping the ones that are not tasks.
    pub fn tasks<I, S>(&self, lines: I) -> Tasks<'_, C, I::IntoIter>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Tasks {
            parser: self,
            lines: lines.into_iter(),
        }
    }

    pub fn parse_collection<I, S>(&self, lines: I) -> TaskCollection
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tasks(lines).collect()
    }
}

pub struct Tasks<'p, C: Clock, I> {
    parser: &'p TaskParser<C>,
    lines: I,
}

impl<C, I, S> Iterator for Tasks<'_, C, I>
where
    C: Clock,
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    type Item = Task;

    fn next(&mut self) -> Option<Task> {
        self.lines
            .by_ref()
            .find_map(|line| self.parser.parse_line(line.as_ref()))
    }
}

/// Parses one line, stamping it with the system clock.
pub fn parse_line(line: &str) -> Option<Task> {
    TaskParser::new(SystemClock).parse_line(line)
}

/// Parses every line in order, dropping the ones that are not tasks.
pub fn parse_collection<I, S>(lines: I) -> TaskCollection
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    TaskParser::new(SystemClock).parse_collection(lines)
}
