// File: ./src/source.rs
//! Reads task text from a file or stream and feeds it to the parser line by
//! line, forwarding each line's diagnostics to the logger.
use crate::clock::Clock;
use crate::model::{Diagnostic, ParseReport, Rejection, TaskCollection, TaskParser};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

fn log_report(line_no: usize, report: &ParseReport) {
    for diagnostic in &report.diagnostics {
        match diagnostic {
            Diagnostic::UnknownTagKey { .. } => {
                log::info!("line {}: {}", line_no, diagnostic)
            }
            Diagnostic::DroppedField { .. } => {
                log::warn!("line {}: {}", line_no, diagnostic)
            }
        }
    }
    match &report.outcome {
        Ok(task) => log::debug!("line {}: task {} '{}'", line_no, task.uid, task.summary),
        Err(rejection @ Rejection::UnrecognizedStatus(_)) => {
            log::warn!("line {}: skipped, {}", line_no, rejection)
        }
        Err(rejection) => log::trace!("line {}: skipped, {}", line_no, rejection),
    }
}

/// Parses every line of `reader` in order. I/O errors abort; bad lines never do.
pub fn read_tasks<C: Clock, R: BufRead>(
    parser: &TaskParser<C>,
    reader: R,
) -> Result<TaskCollection> {
    let mut tasks = TaskCollection::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", idx + 1))?;
        let report = parser.parse_line_report(&line);
        log_report(idx + 1, &report);
        if let Some(task) = report.into_task() {
            tasks.push(task);
        }
    }
    log::info!("Parsed {} task(s)", tasks.len());
    Ok(tasks)
}

pub fn read_tasks_from_path<C: Clock>(
    parser: &TaskParser<C>,
    path: &Path,
) -> Result<TaskCollection> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open input file '{}'", path.display()))?;
    read_tasks(parser, BufReader::new(file))
}
