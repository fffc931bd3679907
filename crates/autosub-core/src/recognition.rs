//! Ingestion of long-running speech recognition responses.
//!
//! The recognizer reports, per result, a list of alternatives; only the first
//! alternative is kept. Word offsets arrive either in protobuf-JSON string form
//! (`"1.500s"`) or as `{ "seconds": .., "nanos": .. }` objects.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::error::{CueError, Result};
use crate::types::{sec_to_ms, RecognitionResult, TimedWord};

#[derive(Clone, Debug, Default, Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    results: Vec<SpeechResult>,
}

#[derive(Clone, Debug, Default, Deserialize)]
struct SpeechResult {
    #[serde(default)]
    alternatives: Vec<Alternative>,
}

#[derive(Clone, Debug, Default, Deserialize)]
struct Alternative {
    #[serde(default)]
    transcript: Option<String>,
    #[serde(default)]
    words: Vec<WordInfo>,
}

#[derive(Clone, Debug, Default, Deserialize)]
struct WordInfo {
    #[serde(default)]
    word: Option<String>,
    #[serde(default, rename = "startTime", alias = "start_time")]
    start_time: Option<Offset>,
    #[serde(default, rename = "endTime", alias = "end_time")]
    end_time: Option<Offset>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
enum Offset {
    Text(String),
    Number(f64),
    Parts {
        #[serde(default)]
        seconds: Option<Seconds>,
        #[serde(default)]
        nanos: i64,
    },
}

#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
enum Seconds {
    Int(i64),
    Text(String),
}

impl Offset {
    fn to_ms(&self) -> Option<u64> {
        match self {
            Offset::Text(s) => {
                let s = s.trim();
                let s = s.strip_suffix('s').unwrap_or(s);
                s.parse::<f64>().ok().map(sec_to_ms)
            }
            Offset::Number(s) => Some(sec_to_ms(*s)),
            Offset::Parts { seconds, nanos } => {
                let seconds = match seconds {
                    None => 0,
                    Some(Seconds::Int(v)) => *v,
                    Some(Seconds::Text(s)) => s.trim().parse::<i64>().ok()?,
                };
                let total_ms = seconds
                    .saturating_mul(1000)
                    .saturating_add(nanos.saturating_add(500_000) / 1_000_000);
                Some(u64::try_from(total_ms).unwrap_or(0))
            }
        }
    }
}

fn offset_ms(offset: Option<&Offset>, key: &'static str, result: usize, pos: usize) -> u64 {
    let Some(offset) = offset else { return 0 };
    offset.to_ms().unwrap_or_else(|| {
        tracing::warn!(result, pos, key, ?offset, "unparseable word offset, using zero");
        0
    })
}

fn convert(results: Vec<SpeechResult>) -> Vec<RecognitionResult> {
    results
        .into_iter()
        .enumerate()
        .map(|(result_idx, result)| {
            let Some(alternative) = result.alternatives.into_iter().next() else {
                tracing::warn!(result = result_idx, "recognition result has no alternatives");
                return RecognitionResult::empty();
            };
            if alternative.words.is_empty() {
                tracing::debug!(
                    result = result_idx,
                    transcript = alternative.transcript.as_deref().unwrap_or(""),
                    "recognition result carries no word offsets"
                );
            }

            alternative
                .words
                .into_iter()
                .enumerate()
                .map(|(pos, info)| {
                    let text = info.word.as_deref().map(str::trim).unwrap_or("");
                    if text.is_empty() {
                        tracing::warn!(result = result_idx, pos, "word without text, leaving a gap");
                        return None;
                    }
                    let start_ms = offset_ms(info.start_time.as_ref(), "startTime", result_idx, pos);
                    let end_ms = offset_ms(info.end_time.as_ref(), "endTime", result_idx, pos);
                    Some(TimedWord::new(text, start_ms, end_ms))
                })
                .collect()
        })
        .collect()
}

/// Parses a recognition response, or a bare array of its results.
pub fn parse_response(json: &str) -> Result<Vec<RecognitionResult>> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| CueError::json("parsing recognition response", e))?;

    let results = if value.is_array() {
        serde_json::from_value::<Vec<SpeechResult>>(value)
    } else {
        serde_json::from_value::<RecognizeResponse>(value).map(|r| r.results)
    }
    .map_err(|e| CueError::json("decoding recognition results", e))?;

    Ok(convert(results))
}

pub fn read_response<R: Read>(mut reader: R) -> Result<Vec<RecognitionResult>> {
    let mut json = String::new();
    reader
        .read_to_string(&mut json)
        .map_err(|e| CueError::io("reading recognition response", e))?;
    parse_response(&json)
}

pub fn load_response<P: AsRef<Path>>(p: P) -> Result<Vec<RecognitionResult>> {
    let json = std::fs::read_to_string(p)
        .map_err(|e| CueError::io("opening recognition response", e))?;
    parse_response(&json)
}
