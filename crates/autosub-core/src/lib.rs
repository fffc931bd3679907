mod error;

pub mod binner;
pub mod config;
pub mod recognition;
pub mod srt;

mod types;

pub use binner::{bin, CueBinner, DEFAULT_BIN_SIZE};
pub use config::{bin_with_config, BinSize, BinnerConfig, TimePrecision};
pub use error::{CueError, Result};
pub use types::{RecognitionResult, SubtitleCue, TimedWord};
