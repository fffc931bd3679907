use anyhow::{Context, Result};
use autosub_core::recognition::{load_response, read_response};
use autosub_core::{bin_with_config, srt, BinnerConfig, RecognitionResult, SubtitleCue, TimePrecision};
use clap::{Args, ValueEnum};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// SubRip subtitles
    Srt,
    /// Cue list as JSON
    Json,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Srt => "srt",
            OutputFormat::Json => "json",
        }
    }
}

#[derive(Args, Debug)]
pub struct BinArgs {
    /// Speech recognition response as JSON ('-' reads stdin)
    pub input: String,

    /// Output file ('-' writes stdout); defaults to the input path with the format's extension
    #[arg(short, long)]
    pub output: Option<String>,

    /// TOML file with binner settings
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Target maximum cue span, in seconds (overrides the config file)
    #[arg(long, env = "AUTOSUB_BIN_SIZE", allow_negative_numbers = true)]
    pub bin_size: Option<f64>,

    /// Offset precision: millisecond or whole-seconds (overrides the config file)
    #[arg(long, env = "AUTOSUB_PRECISION")]
    pub precision: Option<TimePrecision>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Srt)]
    pub format: OutputFormat,
}

#[derive(Debug, PartialEq, Eq)]
enum OutputTarget {
    Stdout,
    File(PathBuf),
}

fn output_target(input: &str, output: Option<&str>, format: OutputFormat) -> OutputTarget {
    match output {
        Some("-") => OutputTarget::Stdout,
        Some(path) => OutputTarget::File(PathBuf::from(path)),
        None if input == "-" => OutputTarget::Stdout,
        None => {
            let input = Path::new(input);
            let candidate = input.with_extension(format.extension());
            if candidate == input {
                // Never overwrite the response we read from.
                OutputTarget::File(input.with_extension(format!("cues.{}", format.extension())))
            } else {
                OutputTarget::File(candidate)
            }
        }
    }
}

fn resolve_config(args: &BinArgs) -> Result<BinnerConfig> {
    let mut config = match &args.config {
        Some(path) => BinnerConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => BinnerConfig::default(),
    };
    if let Some(bin_size_s) = args.bin_size {
        config.bin_size_s = bin_size_s;
    }
    if let Some(precision) = args.precision {
        config.precision = precision;
    }
    config.validate()?;
    Ok(config)
}

fn render_json(cues: &[SubtitleCue]) -> Result<String> {
    let mut json = serde_json::to_string_pretty(cues)?;
    json.push('\n');
    Ok(json)
}

pub fn run_bin(args: BinArgs) -> Result<()> {
    let span = tracing::info_span!("bin", input = %args.input);
    let _enter = span.enter();

    let config = resolve_config(&args)?;

    let results = if args.input == "-" {
        read_response(std::io::stdin().lock())?
    } else {
        load_response(&args.input).with_context(|| format!("reading {}", args.input))?
    };
    let words: usize = results.iter().map(RecognitionResult::word_count).sum();

    let cues = bin_with_config(&results, &config)?;
    info!(
        results = results.len(),
        words,
        cues = cues.len(),
        bin_size_s = config.bin_size_s,
        precision = ?config.precision,
        "binned transcript"
    );

    match (output_target(&args.input, args.output.as_deref(), args.format), args.format) {
        (OutputTarget::File(path), OutputFormat::Srt) => {
            srt::write_srt(&path, &cues).with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "wrote subtitles");
        }
        (OutputTarget::File(path), OutputFormat::Json) => {
            std::fs::write(&path, render_json(&cues)?)
                .with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "wrote cue list");
        }
        (OutputTarget::Stdout, format) => {
            let rendered = match format {
                OutputFormat::Srt => srt::compose(&cues),
                OutputFormat::Json => render_json(&cues)?,
            };
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(())
}
