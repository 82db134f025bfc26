//! Content hash command
//!
//! Recomputes the digest the intake endpoints would assign to a payload, so
//! stored rows can be traced back to a submission file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{NaiveDateTime, Utc};
use clap::{Parser, ValueEnum};
use serde_json::Value;
use startlab_core::intake::{science_projection, startup_projection, FlatIntake};
use startlab_core::{canonical_json, content_hash};

/// How the payload is projected before hashing
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashMode {
    /// Whole document as-is
    Raw,
    /// Flat science application (adds the timestamp)
    Science,
    /// Flat startup application
    Startup,
}

/// Arguments for the hash command
#[derive(Parser, Debug)]
pub struct HashArgs {
    /// JSON payload file
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Projection to hash
    #[arg(long, value_enum, default_value = "raw")]
    pub mode: HashMode,

    /// Submission time, e.g. 2025-03-14T09:26:53.589793 (default: now, UTC)
    #[arg(long, value_parser = parse_timestamp)]
    pub timestamp: Option<NaiveDateTime>,
}

fn parse_timestamp(s: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .map_err(|e| format!("expected YYYY-MM-DDTHH:MM:SS[.ffffff]: {e}"))
}

/// Canonical form and digest of `raw` under `mode`.
fn digest(raw: &Value, mode: HashMode, timestamp: NaiveDateTime) -> Result<(String, String)> {
    let projection = match mode {
        HashMode::Raw => raw.clone(),
        HashMode::Science | HashMode::Startup => {
            let map = raw.as_object().context("payload must be a JSON object")?;
            let (projection, intake) = if mode == HashMode::Science {
                (
                    science_projection(map, timestamp),
                    FlatIntake::science(raw, timestamp)?,
                )
            } else {
                (startup_projection(map), FlatIntake::startup(raw)?)
            };
            tracing::debug!(kind = %intake.kind(), "Payload passes intake validation");
            projection
        }
    };
    Ok((canonical_json(&projection)?, content_hash(&projection)?))
}

/// Print the canonical JSON and its SHA-256
pub fn run_hash(args: HashArgs) -> Result<()> {
    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let raw: Value = serde_json::from_str(&text)
        .with_context(|| format!("{} is not valid JSON", args.file.display()))?;

    let timestamp = args.timestamp.unwrap_or_else(|| Utc::now().naive_utc());
    let (canonical, sha256) = digest(&raw, args.mode, timestamp)?;

    println!("{canonical}");
    println!("sha256: {sha256}");
    Ok(())
}
