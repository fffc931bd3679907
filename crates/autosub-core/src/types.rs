use serde::Serialize;

/// One recognized word with its offsets from the start of the audio.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TimedWord {
    pub text: String,
    pub start_ms: u64,
    /// Never earlier than `start_ms`.
    pub end_ms: u64,
}

impl TimedWord {
    /// Builds a word, clamping an end that precedes the start up to the start.
    pub fn new(text: impl Into<String>, start_ms: u64, end_ms: u64) -> Self {
        Self {
            text: text.into(),
            start_ms,
            end_ms: end_ms.max(start_ms),
        }
    }

    /// Builds a word from offsets in seconds. Negative or non-finite offsets become zero.
    pub fn from_secs(text: impl Into<String>, start_s: f64, end_s: f64) -> Self {
        Self::new(text, sec_to_ms(start_s), sec_to_ms(end_s))
    }
}

/// The ordered words recognized for one utterance or segment.
///
/// Positions are kept even for words that could not be read, so a result can
/// report a gap (`word(pos) == None`) in the middle of its word list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecognitionResult {
    slots: Vec<Option<TimedWord>>,
}

impl RecognitionResult {
    pub fn new(words: Vec<TimedWord>) -> Self {
        words.into_iter().collect()
    }

    /// Builds a result whose `None` slots mark absent words.
    pub fn from_slots(slots: Vec<Option<TimedWord>>) -> Self {
        Self { slots }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn word(&self, pos: usize) -> Option<&TimedWord> {
        self.slots.get(pos).and_then(Option::as_ref)
    }

    /// Present words in order, skipping gaps.
    pub fn words(&self) -> impl Iterator<Item = &TimedWord> + '_ {
        self.slots.iter().flatten()
    }

    /// Number of positions, gaps included.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn word_count(&self) -> usize {
        self.words().count()
    }

    /// True when no position holds a word.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub(crate) fn words_mut(&mut self) -> impl Iterator<Item = &mut TimedWord> + '_ {
        self.slots.iter_mut().flatten()
    }
}

impl FromIterator<TimedWord> for RecognitionResult {
    fn from_iter<I: IntoIterator<Item = TimedWord>>(iter: I) -> Self {
        Self::from_slots(iter.into_iter().map(Some).collect())
    }
}

impl FromIterator<Option<TimedWord>> for RecognitionResult {
    fn from_iter<I: IntoIterator<Item = Option<TimedWord>>>(iter: I) -> Self {
        Self::from_slots(iter.into_iter().collect())
    }
}

/// A single subtitle display unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SubtitleCue {
    /// 1-based and contiguous across a whole binning call.
    pub index: usize,
    pub start_ms: u64,
    pub end_ms: u64,
    pub text: String,
}

pub(crate) fn sec_to_ms(s: f64) -> u64 {
    if !s.is_finite() || s.is_sign_negative() {
        return 0;
    }

    (s * 1000.0).round() as u64
}
