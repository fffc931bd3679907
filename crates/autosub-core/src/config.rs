use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::binner::{bin, DEFAULT_BIN_SIZE};
use crate::error::{CueError, Result};
use crate::types::{RecognitionResult, SubtitleCue};

/// How word offsets are quantized before binning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimePrecision {
    /// Keep offsets at millisecond resolution.
    #[default]
    Millisecond,
    /// Truncate every offset to the whole second, reproducing legacy subtitle output.
    WholeSeconds,
}

impl TimePrecision {
    pub fn quantize_ms(self, ms: u64) -> u64 {
        match self {
            TimePrecision::Millisecond => ms,
            TimePrecision::WholeSeconds => ms / 1000 * 1000,
        }
    }
}

impl FromStr for TimePrecision {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "millisecond" | "ms" => Ok(TimePrecision::Millisecond),
            "whole-seconds" | "seconds" | "legacy" => Ok(TimePrecision::WholeSeconds),
            _ => Err(format!(
                "Invalid precision '{s}'. Expected: millisecond or whole-seconds"
            )),
        }
    }
}

/// A validated, strictly positive cue duration target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinSize(Duration);

impl BinSize {
    pub fn from_secs_f64(secs: f64) -> Result<Self> {
        if !secs.is_finite() || secs <= 0.0 {
            return Err(CueError::invalid_bin_size(format!("{secs}s")));
        }
        // Floor, never round: the deadline must not reach past `start + secs`.
        let ms = (secs * 1000.0).floor();
        if ms >= u64::MAX as f64 {
            return Err(CueError::invalid_bin_size(format!("{secs}s")));
        }
        let sub_ms_nanos = ((secs * 1000.0 - ms) * 1_000_000.0) as u64;
        let size = Duration::from_millis(ms as u64) + Duration::from_nanos(sub_ms_nanos);
        if size.is_zero() {
            // Positive but below nanosecond resolution.
            return Ok(Self(Duration::from_nanos(1)));
        }
        Ok(Self(size))
    }

    pub fn from_millis(ms: u64) -> Result<Self> {
        if ms == 0 {
            return Err(CueError::invalid_bin_size("0ms"));
        }
        Ok(Self(Duration::from_millis(ms)))
    }

    pub fn as_duration(self) -> Duration {
        self.0
    }
}

impl Default for BinSize {
    fn default() -> Self {
        Self(DEFAULT_BIN_SIZE)
    }
}

fn default_bin_size_s() -> f64 {
    DEFAULT_BIN_SIZE.as_secs_f64()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BinnerConfig {
    /// Target maximum span of a cue, in seconds.
    #[serde(default = "default_bin_size_s")]
    pub bin_size_s: f64,
    #[serde(default)]
    pub precision: TimePrecision,
}

impl Default for BinnerConfig {
    fn default() -> Self {
        Self {
            bin_size_s: default_bin_size_s(),
            precision: TimePrecision::default(),
        }
    }
}

impl BinnerConfig {
    pub fn load<P: AsRef<Path>>(p: P) -> Result<Self> {
        let contents =
            std::fs::read_to_string(p).map_err(|e| CueError::io("reading binner config", e))?;
        let config = Self::from_toml_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| CueError::toml("parsing binner config", e))
    }

    pub fn validate(&self) -> Result<BinSize> {
        BinSize::from_secs_f64(self.bin_size_s).map_err(|_| {
            CueError::invalid_config(format!(
                "bin_size_s must be a positive number of seconds, got {}",
                self.bin_size_s
            ))
        })
    }
}

/// Validates `config`, applies its time precision and bins `results`.
pub fn bin_with_config(
    results: &[RecognitionResult],
    config: &BinnerConfig,
) -> Result<Vec<SubtitleCue>> {
    let bin_size = BinSize::from_secs_f64(config.bin_size_s)?;

    match config.precision {
        TimePrecision::Millisecond => bin(results, bin_size.as_duration()),
        precision => {
            let quantized: Vec<RecognitionResult> = results
                .iter()
                .cloned()
                .map(|mut r| {
                    for w in r.words_mut() {
                        w.start_ms = precision.quantize_ms(w.start_ms);
                        w.end_ms = precision.quantize_ms(w.end_ms);
                    }
                    r
                })
                .collect();
            bin(&quantized, bin_size.as_duration())
        }
    }
}
