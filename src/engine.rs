//! Subcommand drivers: read the log, feed a consumer, pick the exit code.

use anyhow::{Context, Result};
use serde_json::json;
use std::path::Path;

use crate::cli::LogArgs;
use crate::codec::{self, Decoded};
use crate::exit_codes::exit;
use crate::handler::dispatch;
use crate::journal::{self, EventLogReader};
use crate::replay::NamespaceImage;
use crate::reporter::Summary;
use crate::validate;

/// How a pass over the log ended.
#[derive(Debug, Default)]
struct ReadOutcome {
    records: u64,
    corrupt: u64,
    stopped_early: bool,
}

impl ReadOutcome {
    fn exit_code(&self) -> Option<i32> {
        (self.corrupt > 0).then_some(exit::CORRUPT_LOG)
    }
}

/// Feed every record of every segment, in order, to `visit`.
fn for_each_record(
    args: &LogArgs,
    mut visit: impl FnMut(&Path, usize, &Decoded) -> Result<()>,
) -> Result<ReadOutcome> {
    let segments = journal::log_segments(&args.log)
        .with_context(|| format!("failed to open event log {}", args.log.display()))?;
    tracing::info!(log = %args.log.display(), segments = segments.len(), "reading event log");

    let mut outcome = ReadOutcome::default();
    for segment in &segments {
        let mut reader = EventLogReader::open(segment)?;
        while let Some(item) = reader.next() {
            match item {
                Ok(decoded) => {
                    outcome.records += 1;
                    visit(segment, reader.line_number(), &decoded)?;
                }
                Err(e) if e.is_corrupt() => {
                    outcome.corrupt += 1;
                    if !args.keep_going {
                        tracing::error!("{e}");
                        outcome.stopped_early = true;
                        return Ok(outcome);
                    }
                    tracing::warn!("skipping: {e}");
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
    tracing::info!(records = outcome.records, corrupt = outcome.corrupt, "finished reading");
    Ok(outcome)
}

pub fn cat(args: LogArgs) -> Result<i32> {
    let outcome = for_each_record(&args, |_, _, decoded| {
        match decoded {
            Decoded::Event(event) if args.json => println!("{}", codec::encode(event)?),
            Decoded::Event(event) => println!("{event}"),
            Decoded::Unrecognized { record, .. } if args.json => println!("{record}"),
            Decoded::Unrecognized { kind, .. } => println!("{kind} (unrecognized)"),
        }
        Ok(())
    })?;
    Ok(outcome.exit_code().unwrap_or(exit::SUCCESS))
}

pub fn summarize(args: LogArgs) -> Result<i32> {
    let mut summary = Summary::new();
    let outcome = for_each_record(&args, |_, _, decoded| {
        dispatch(decoded, &mut summary);
        Ok(())
    })?;
    summary.corrupt = outcome.corrupt;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", summary.render());
        if outcome.stopped_early {
            println!("(stopped at first corrupt record; pass --keep-going to skip it)");
        }
    }
    Ok(outcome.exit_code().unwrap_or(exit::SUCCESS))
}

pub fn check(args: LogArgs) -> Result<i32> {
    let mut violations = 0u64;
    let outcome = for_each_record(&args, |segment, line, decoded| {
        let Some(event) = decoded.event() else {
            return Ok(());
        };
        for violation in validate::check_event(event) {
            violations += 1;
            if args.json {
                let record = json!({
                    "segment": segment,
                    "line": line,
                    "kind": event.kind(),
                    "path": event.path(),
                    "detail": &violation,
                    "message": violation.to_string(),
                });
                println!("{record}");
            } else {
                println!(
                    "{}:{}: {} {}: {}",
                    segment.display(),
                    line,
                    event.kind(),
                    event.path(),
                    violation
                );
            }
        }
        Ok(())
    })?;

    tracing::info!(violations, "check finished");
    if let Some(code) = outcome.exit_code() {
        return Ok(code);
    }
    Ok(if violations > 0 {
        exit::CHECK_VIOLATIONS
    } else {
        exit::SUCCESS
    })
}

pub fn replay(args: LogArgs) -> Result<i32> {
    let mut image = NamespaceImage::new();
    let outcome = for_each_record(&args, |_, _, decoded| {
        dispatch(decoded, &mut image);
        Ok(())
    })?;

    if image.misses() > 0 {
        tracing::warn!(misses = image.misses(), "events referred to paths created before the log began");
    }
    if args.json {
        println!("{}", serde_json::to_string_pretty(&image)?);
    } else {
        print!("{}", image.render());
    }
    Ok(outcome.exit_code().unwrap_or(exit::SUCCESS))
}
