//! Greedy grouping of timed words into subtitle cues.
//!
//! Words are folded into the currently open bin for as long as they end no
//! later than `bin_start + bin_size`. The first word that would overflow closes
//! the bin at the end of the previous word and opens the next bin at its own
//! start. Bins never span two recognition results, but cue indices keep
//! counting across them.

use std::time::Duration;

use crate::error::{CueError, Result};
use crate::types::{RecognitionResult, SubtitleCue, TimedWord};

pub const DEFAULT_BIN_SIZE: Duration = Duration::from_secs(3);

/// Bins every result in order and returns the flattened cue list.
///
/// Fails only when `bin_size` is zero. Offsets are whole milliseconds, so the
/// deadline uses `bin_size` floored to the millisecond; a positive size under
/// 1 ms only keeps zero-length words together. Empty results are skipped and
/// consume no index.
pub fn bin(results: &[RecognitionResult], bin_size: Duration) -> Result<Vec<SubtitleCue>> {
    let mut binner = CueBinner::new(bin_size)?;
    for result in results {
        binner.push_result(result);
    }
    let cues = binner.finish();
    tracing::debug!(results = results.len(), cues = cues.len(), "binned recognition results");
    Ok(cues)
}

/// Cue accumulator carrying the running index from one result to the next.
#[derive(Clone, Debug)]
pub struct CueBinner {
    bin_size: Duration,
    bin_size_ms: u64,
    next_index: usize,
    cues: Vec<SubtitleCue>,
}

impl CueBinner {
    pub fn new(bin_size: Duration) -> Result<Self> {
        if bin_size.is_zero() {
            return Err(CueError::invalid_bin_size(format!("{bin_size:?}")));
        }
        Ok(Self {
            bin_size,
            bin_size_ms: u64::try_from(bin_size.as_millis()).unwrap_or(u64::MAX),
            next_index: 1,
            cues: Vec::new(),
        })
    }

    pub fn bin_size(&self) -> Duration {
        self.bin_size
    }

    /// Index the next emitted cue will carry.
    pub fn next_index(&self) -> usize {
        self.next_index
    }

    pub fn cues(&self) -> &[SubtitleCue] {
        &self.cues
    }

    /// Bins one result, returning how many cues it produced.
    ///
    /// Absent positions are skipped with a warning; the first present word
    /// opens the first bin.
    pub fn push_result(&mut self, result: &RecognitionResult) -> usize {
        let emitted_before = self.cues.len();
        let mut open: Option<OpenBin> = None;

        for pos in 0..result.len() {
            let Some(word) = result.word(pos) else {
                tracing::warn!(pos, "word missing from recognition result, skipping");
                continue;
            };

            match open.as_mut() {
                None => open = Some(OpenBin::open(word, self.bin_size_ms)),
                Some(bin) if bin.accepts(word) => bin.extend(word),
                Some(bin) => {
                    let closed = std::mem::replace(bin, OpenBin::open(word, self.bin_size_ms));
                    self.emit(closed);
                }
            }
        }

        let Some(last) = open else {
            tracing::debug!(next_index = self.next_index, "skipping empty recognition result");
            return 0;
        };
        self.emit(last);

        self.cues.len() - emitted_before
    }

    pub fn finish(self) -> Vec<SubtitleCue> {
        self.cues
    }

    fn emit(&mut self, bin: OpenBin) {
        self.cues.push(bin.close(self.next_index));
        self.next_index += 1;
    }
}

#[derive(Debug)]
struct OpenBin {
    start_ms: u64,
    deadline_ms: u64,
    last_end_ms: u64,
    text: String,
}

impl OpenBin {
    fn open(word: &TimedWord, bin_size_ms: u64) -> Self {
        Self {
            start_ms: word.start_ms,
            deadline_ms: word.start_ms.saturating_add(bin_size_ms),
            last_end_ms: word.end_ms,
            text: word.text.clone(),
        }
    }

    // Inclusive: a word ending exactly on the deadline still fits.
    fn accepts(&self, word: &TimedWord) -> bool {
        word.end_ms <= self.deadline_ms
    }

    fn extend(&mut self, word: &TimedWord) {
        self.text.push(' ');
        self.text.push_str(&word.text);
        self.last_end_ms = word.end_ms;
    }

    fn close(self, index: usize) -> SubtitleCue {
        SubtitleCue {
            index,
            start_ms: self.start_ms,
            end_ms: self.last_end_ms.max(self.start_ms),
            text: self.text,
        }
    }
}
