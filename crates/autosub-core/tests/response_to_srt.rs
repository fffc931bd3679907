use std::io::Write;
use std::time::Duration;

use autosub_core::recognition::{load_response, parse_response};
use autosub_core::{bin, bin_with_config, srt, BinnerConfig, TimePrecision, DEFAULT_BIN_SIZE};

const RESPONSE: &str = r#"{
  "results": [
    {
      "alternatives": [{
        "transcript": "one two three",
        "confidence": 0.91,
        "words": [
          {"word": "one", "startTime": "0s", "endTime": "0.500s"},
          {"word": "two", "startTime": "0.600s", "endTime": "1.200s"},
          {"word": "three", "startTime": "3.400s", "endTime": "4s"}
        ]
      }]
    },
    {"alternatives": []},
    {
      "alternatives": [{
        "words": [
          {"word": "four", "startTime": "5.250s", "endTime": "5.750s"},
          {"word": "five", "startTime": "6s", "endTime": "8.250s"}
        ]
      }]
    }
  ]
}"#;

#[test]
fn response_to_srt_document() {
    let results = parse_response(RESPONSE).expect("response should parse");
    let cues = bin(&results, DEFAULT_BIN_SIZE).expect("binning should succeed");

    let expected = "\
1
00:00:00,000 --> 00:00:01,200
one two

2
00:00:03,400 --> 00:00:04,000
three

3
00:00:05,250 --> 00:00:08,250
four five

";
    assert_eq!(srt::compose(&cues), expected);
}

#[test]
fn legacy_precision_from_a_config_file() {
    let mut config_file = tempfile::NamedTempFile::new().unwrap();
    writeln!(config_file, "bin_size_s = 2.0\nprecision = \"whole-seconds\"").unwrap();
    let config = BinnerConfig::load(config_file.path()).unwrap();
    assert_eq!(config.precision, TimePrecision::WholeSeconds);

    let mut response_file = tempfile::NamedTempFile::new().unwrap();
    response_file.write_all(RESPONSE.as_bytes()).unwrap();
    let results = load_response(response_file.path()).unwrap();

    let cues = bin_with_config(&results, &config).unwrap();

    let spans: Vec<(u64, u64)> = cues.iter().map(|c| (c.start_ms, c.end_ms)).collect();
    // Truncated: one [0,0] two [0,1] three [3,4] four [5,5] five [6,8].
    assert_eq!(spans, vec![(0, 1000), (3000, 4000), (5000, 5000), (6000, 8000)]);
    let indices: Vec<usize> = cues.iter().map(|c| c.index).collect();
    assert_eq!(indices, vec![1, 2, 3, 4]);
}

#[test]
fn smaller_bins_split_more_often() {
    let results = parse_response(RESPONSE).unwrap();

    let cues = bin(&results, Duration::from_millis(500)).unwrap();

    let texts: Vec<&str> = cues.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["one", "two", "three", "four", "five"]);
}

#[test]
fn text_less_word_is_skipped_and_indices_stay_contiguous() {
    let json = r#"{"results": [
        {"alternatives": [{"words": [
            {"word": "left", "startTime": "0s", "endTime": "0.4s"},
            {"startTime": "0.5s", "endTime": "9s"},
            {"word": "right", "startTime": "1s", "endTime": "1.4s"}
        ]}]},
        {"alternatives": [{"words": [
            {"word": "   ", "startTime": "4s", "endTime": "4.2s"},
            {"word": "after", "startTime": "5s", "endTime": "5.5s"}
        ]}]}
    ]}"#;
    let results = parse_response(json).unwrap();

    let cues = bin(&results, DEFAULT_BIN_SIZE).unwrap();

    let summary: Vec<(usize, u64, u64, &str)> = cues
        .iter()
        .map(|c| (c.index, c.start_ms, c.end_ms, c.text.as_str()))
        .collect();
    assert_eq!(summary, vec![(1, 0, 1400, "left right"), (2, 5000, 5500, "after")]);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gaps.srt");
    srt::write_srt(&path, &cues).unwrap();
    let written = std::fs::read_to_string(&path).unwrap().replace("\r\n", "\n");
    assert!(written.starts_with("1\n00:00:00,000 --> 00:00:01,400\nleft right\n"));
    assert!(written.contains("2\n00:00:05,000 --> 00:00:05,500\nafter"));
}
