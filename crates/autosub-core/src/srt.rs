//! SubRip (SRT) encoding of subtitle cues on top of `srtlib`.

use std::path::Path;

use srtlib::{Subtitle, Subtitles, Timestamp};

use crate::error::{CueError, Result};
use crate::types::SubtitleCue;

/// Splits a millisecond offset into an SRT timestamp. Hours saturate at 255.
pub fn to_timestamp(ms: u64) -> Timestamp {
    let hours = u8::try_from(ms / 3_600_000).unwrap_or(u8::MAX);
    let mins = ((ms % 3_600_000) / 60_000) as u8;
    let secs = ((ms % 60_000) / 1_000) as u8;
    let millis = (ms % 1_000) as u16;

    Timestamp::new(hours, mins, secs, millis)
}

/// `HH:MM:SS,mmm`
pub fn format_timestamp(ms: u64) -> String {
    to_timestamp(ms).to_string()
}

pub fn to_subtitle(cue: &SubtitleCue) -> Subtitle {
    Subtitle::new(
        cue.index,
        to_timestamp(cue.start_ms),
        to_timestamp(cue.end_ms),
        cue.text.clone(),
    )
}

pub fn to_subtitles(cues: &[SubtitleCue]) -> Subtitles {
    let mut subtitles = Subtitles::new();
    for cue in cues {
        subtitles.push(to_subtitle(cue));
    }
    subtitles
}

/// Renders cues as an SRT document, each entry followed by a blank line.
pub fn compose(cues: &[SubtitleCue]) -> String {
    cues.iter()
        .map(|cue| format!("{}\n\n", to_subtitle(cue)))
        .collect()
}

pub fn write_srt<P: AsRef<Path>>(path: P, cues: &[SubtitleCue]) -> Result<()> {
    let path = path.as_ref();
    to_subtitles(cues)
        .write_to_file(path, None)
        .map_err(|e| CueError::srt("writing subtitle file", e))?;
    tracing::debug!(path = %path.display(), cues = cues.len(), "wrote srt");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cue(index: usize, start_ms: u64, end_ms: u64, text: &str) -> SubtitleCue {
        SubtitleCue {
            index,
            start_ms,
            end_ms,
            text: text.to_string(),
        }
    }

    #[test]
    fn timestamps_carry_milliseconds_across_boundaries() {
        assert_eq!(format_timestamp(0), "00:00:00,000");
        assert_eq!(format_timestamp(1_200), "00:00:01,200");
        assert_eq!(format_timestamp(59_999), "00:00:59,999");
        assert_eq!(format_timestamp(61_005), "00:01:01,005");
        assert_eq!(format_timestamp(3_600_000), "01:00:00,000");
        assert_eq!(format_timestamp(10 * 3_600_000 + 1), "10:00:00,001");
    }

    #[test]
    fn long_offsets_saturate_the_hour_field() {
        assert_eq!(format_timestamp(1_000 * 3_600_000 + 5), "255:00:00,005");
    }

    #[test]
    fn cues_map_onto_subtitles() {
        let sub = to_subtitle(&cue(7, 3_400, 4_000, "three"));
        assert_eq!(sub.to_string(), "7\n00:00:03,400 --> 00:00:04,000\nthree");
    }

    #[test]
    fn compose_matches_subrip_layout() {
        let cues = [cue(1, 0, 1_200, "one two"), cue(2, 3_400, 4_000, "three")];

        let expected = "1\n00:00:00,000 --> 00:00:01,200\none two\n\n\
                        2\n00:00:03,400 --> 00:00:04,000\nthree\n\n";
        assert_eq!(compose(&cues), expected);
    }

    #[test]
    fn compose_of_nothing_is_empty() {
        assert_eq!(compose(&[]), "");
    }

    #[test]
    fn write_srt_creates_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.srt");
        let cues = [cue(1, 1_000, 1_500, "hello"), cue(2, 2_000, 2_250, "again")];

        write_srt(&path, &cues).unwrap();

        let written = std::fs::read_to_string(&path).unwrap().replace("\r\n", "\n");
        assert_eq!(written.trim_end(), compose(&cues).trim_end());
    }

    #[test]
    fn write_srt_into_a_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.srt");

        let err = write_srt(&path, &[cue(1, 0, 100, "x")]).unwrap_err();
        assert!(matches!(err, CueError::Srt { .. }));
    }
}
