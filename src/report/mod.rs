use colored::Colorize;
use serde::Serialize;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::dispatch::DispatchOutcome;
use crate::filter::Verdict;
use crate::pipeline::PipelineOutcome;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write report file: {0}")]
    FileWrite(#[from] std::io::Error),

    #[error("Failed to serialize payload: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Print one line per path with its filter verdict.
///
/// src/app.ts          will document
/// package-lock.json   skipped (matches /package-lock\.json/)
pub fn print_verdicts(verdicts: &[(String, Verdict)]) {
    let width = verdicts.iter().map(|(path, _)| path.len()).max().unwrap_or(0);
    for (path, verdict) in verdicts {
        println!("{path:<width$}  {}", colorize_verdict(verdict));
    }
    let documentable = verdicts.iter().filter(|(_, v)| v.is_documentable()).count();
    println!();
    println!("{documentable} of {} files will be documented", verdicts.len());
}

/// Print how a replayed event ended.
pub fn print_outcome(outcome: &PipelineOutcome) {
    println!("{}", colorize_outcome(outcome));
    if let PipelineOutcome::Dispatched(DispatchOutcome::Accepted { response }) = outcome {
        match serde_json::to_string_pretty(response) {
            Ok(pretty) => println!("{pretty}"),
            Err(_) => println!("{response}"),
        }
    }
}

/// Write `value` as pretty JSON to stdout (default) or to a file.
#[instrument(skip(value))]
pub fn write_json<T: Serialize>(value: &T, output_path: Option<&Path>) -> Result<(), ReportError> {
    let json = serde_json::to_string_pretty(value)?;
    match output_path {
        None => {
            debug!("writing payload to terminal");
            println!("{json}");
            Ok(())
        }
        Some(path) => {
            debug!(path = %path.display(), "writing payload to file");
            std::fs::write(path, json)?;
            Ok(())
        }
    }
}

fn colorize_verdict(verdict: &Verdict) -> colored::ColoredString {
    match verdict {
        Verdict::Documentable => verdict.to_string().green().bold(),
        Verdict::Skipped(_) => verdict.to_string().yellow(),
        Verdict::UnlistedExtension(_) | Verdict::NoExtension => verdict.to_string().dimmed(),
    }
}

fn colorize_outcome(outcome: &PipelineOutcome) -> colored::ColoredString {
    let text = outcome.to_string();
    match outcome {
        PipelineOutcome::Dispatched(DispatchOutcome::Accepted { .. }) | PipelineOutcome::Commented => {
            text.green().bold()
        }
        PipelineOutcome::Dispatched(DispatchOutcome::Failed { .. }) => text.red().bold(),
        _ => text.yellow(),
    }
}
