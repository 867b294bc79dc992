// File: ./src/cli.rs
//! Shared command-line plumbing: argument definitions, config merging,
//! logger setup and the file-to-calendar conversion.
use crate::clock::Clock;
use crate::config::Config;
use crate::model::TaskParser;
use crate::model::adapter::to_ics_string;
use crate::source::{read_tasks, read_tasks_from_path};
use anyhow::{Context, Result};
use clap::{Args, Parser};
use log::LevelFilter;
use simplelog::{ColorChoice, TermLogger, TerminalMode};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// Use a different directory for the config file (<root>/config/config.toml).
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// error, warn, info, debug or trace.
    #[arg(long, env = "TXT2ICS_LOG")]
    pub log_level: Option<String>,
}

/// Converts TODOs in a text file into an iCal file.
#[derive(Parser, Debug, Clone)]
#[command(name = "txt2ics", version, about)]
pub struct ConvertArgs {
    /// Task text file ("-" or nothing for stdin).
    #[arg(env = "infile")]
    pub infile: Option<PathBuf>,

    /// Calendar output file ("-" or nothing for stdout).
    #[arg(short, long, env = "outfile")]
    pub outfile: Option<PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl ConvertArgs {
    /// Flags and environment win over the config file.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(infile) = &self.infile {
            config.infile = Some(infile.clone());
        }
        if let Some(outfile) = &self.outfile {
            config.outfile = Some(outfile.clone());
        }
        if let Some(level) = &self.common.log_level {
            config.log_level = level.clone();
        }
    }
}

/// Serves the tasks of a text file as an iCal calendar over HTTP.
#[derive(Parser, Debug, Clone)]
#[command(name = "icsd", version, about)]
pub struct ServeArgs {
    /// Task text file, re-read on every request.
    #[arg(env = "infile")]
    pub infile: Option<PathBuf>,

    #[arg(long, env = "host")]
    pub host: Option<String>,

    #[arg(short, long, env = "port")]
    pub port: Option<u16>,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl ServeArgs {
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(infile) = &self.infile {
            config.infile = Some(infile.clone());
        }
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(level) = &self.common.log_level {
            config.log_level = level.clone();
        }
    }
}

/// Logs go to stderr; stdout may carry the calendar.
pub fn init_logging(level: LevelFilter) -> Result<()> {
    TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .context("Failed to initialize logger")
}

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// Write through a temp file so a failed run never leaves half a calendar behind.
pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<()> {
    let path = path.as_ref();
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("Failed to write '{}'", tmp_path.display()))?;
    fs::rename(&tmp_path, path)
        .with_context(|| format!("Failed to move calendar into '{}'", path.display()))?;
    Ok(())
}

/// Reads tasks from `reader` and writes the calendar to `writer`. Returns the task count.
pub fn convert<C: Clock, R: BufRead, W: Write>(
    parser: &TaskParser<C>,
    reader: R,
    mut writer: W,
) -> Result<usize> {
    let tasks = read_tasks(parser, reader)?;
    writer.write_all(to_ics_string(&tasks).as_bytes())?;
    writer.flush()?;
    Ok(tasks.len())
}

/// Runs the converter as configured.
pub fn run_convert<C: Clock>(parser: &TaskParser<C>, config: &Config) -> Result<usize> {
    let tasks = match config.infile.as_deref() {
        Some(path) if !is_stdio(path) => read_tasks_from_path(parser, path)?,
        _ => read_tasks(parser, io::stdin().lock())?,
    };
    let ics = to_ics_string(&tasks);

    match config.outfile.as_deref() {
        Some(path) if !is_stdio(path) => {
            atomic_write(path, ics)?;
            log::info!("Wrote {} task(s) to {}", tasks.len(), path.display());
        }
        _ => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(ics.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(tasks.len())
}
