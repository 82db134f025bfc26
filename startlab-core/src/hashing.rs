//! Canonical JSON and content hashing
//!
//! The content hash groups every row written by one intake call. It is the
//! SHA-256 of a canonical serialization of the payload projection:
//!
//!   - object keys sorted by code point, at every depth
//!   - `", "` between items, `": "` between key and value
//!   - non-ASCII text written verbatim (UTF-8), control characters escaped
//!   - integers exactly as submitted, any size
//!   - floats in shortest round-trip form: fixed notation with at least one
//!     fractional digit (`1.5`, `100000.0`) when the decimal exponent is in
//!     `-4..16`, otherwise `1e-07` / `1.5e+16` with a signed two-digit exponent
//!
//! Digests are lowercase hex, 64 characters.

use std::io;

use chrono::{NaiveDateTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::ser::Formatter;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::error::{CoreError, Result};
use crate::validation::ValidationError;

/// Compact formatter with a space after each separator.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_f64<W>(&mut self, writer: &mut W, value: f64) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(float_repr(value).as_bytes())
    }

    /// Numbers parsed from request bodies keep their source text.
    fn write_number_str<W>(&mut self, writer: &mut W, value: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(number_repr(value).as_bytes())
    }
}

/// Canonical text of a JSON number literal.
fn number_repr(literal: &str) -> String {
    if !literal.contains(['.', 'e', 'E']) {
        let digits = literal.trim_start_matches('-');
        return if digits.bytes().all(|b| b == b'0') {
            "0".to_owned()
        } else {
            literal.to_owned()
        };
    }
    match literal.parse::<f64>() {
        Ok(value) => float_repr(value),
        Err(_) => literal.to_owned(),
    }
}

/// Shortest round-trip text of a float.
fn float_repr(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_owned();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_owned();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0.0" } else { "0.0" }.to_owned();
    }

    // `{:e}` yields the shortest digits, e.g. "-1.2345e3"
    let scientific = format!("{:e}", value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return scientific;
    };
    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let point = exponent + 1;

    if !(-3..=16).contains(&point) {
        let (head, tail) = digits.split_at(1);
        let fraction = if tail.is_empty() {
            String::new()
        } else {
            format!(".{tail}")
        };
        let exp_sign = if exponent < 0 { '-' } else { '+' };
        return format!("{sign}{head}{fraction}e{exp_sign}{:02}", exponent.abs());
    }

    if point <= 0 {
        let zeros = "0".repeat(point.unsigned_abs() as usize);
        return format!("{sign}0.{zeros}{digits}");
    }

    let point = point as usize;
    if digits.len() <= point {
        let zeros = "0".repeat(point - digits.len());
        format!("{sign}{digits}{zeros}.0")
    } else {
        let (whole, fraction) = digits.split_at(point);
        format!("{sign}{whole}.{fraction}")
    }
}

/// Rebuild a value with every object's keys in sorted order.
///
/// Insertion order is sorted order, so the result serializes identically
/// whether or not serde_json's `preserve_order` feature is active.
fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let sorted: Map<String, Value> = entries
                .into_iter()
                .map(|(k, v)| (k.clone(), sort_keys(v)))
                .collect();
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}

/// Canonical serialization of a JSON value.
pub fn canonical_json(value: &Value) -> Result<String> {
    let sorted = sort_keys(value);
    let mut buf = Vec::with_capacity(256);
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
    sorted
        .serialize(&mut ser)
        .map_err(|e| CoreError::json("canonical serialization", e))?;
    // serde_json only ever writes valid UTF-8
    String::from_utf8(buf).map_err(|e| CoreError::config(format!("non UTF-8 output: {e}")))
}

/// Lowercase hex SHA-256 of arbitrary bytes.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

/// SHA-256 of the canonical serialization of `value`.
pub fn content_hash(value: &Value) -> Result<String> {
    let canonical = canonical_json(value)?;
    Ok(sha256_hex(canonical.as_bytes()))
}

/// Naive-UTC ISO-8601 timestamp embedded in hash projections.
///
/// `YYYY-MM-DDTHH:MM:SS.ffffff`, with the fraction dropped when the
/// microsecond part is zero.
pub fn iso_timestamp(ts: NaiveDateTime) -> String {
    let micros = ts.nanosecond() / 1_000;
    let base = ts.format("%Y-%m-%dT%H:%M:%S").to_string();
    if micros == 0 {
        base
    } else {
        format!("{}.{:06}", base, micros)
    }
}

/// Lowercase hex SHA-256 digest
static HASH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9a-f]{64}$").expect("invalid hash regex"));

/// A content hash taken from user input (URL path, CLI argument)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentHash(String);

impl ContentHash {
    /// Accepts 64 hex digits; uppercase input is normalized to lowercase.
    pub fn new(s: &str) -> std::result::Result<Self, ValidationError> {
        let normalized = s.trim().to_ascii_lowercase();
        if normalized.is_empty() {
            return Err(ValidationError::missing("sha256"));
        }
        if !HASH_RE.is_match(&normalized) {
            return Err(ValidationError::InvalidFormat {
                field: "sha256",
                reason: "must be 64 hexadecimal characters",
            });
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ContentHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
