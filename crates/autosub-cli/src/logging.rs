//! Console log formatting for the `autosub` binary.
//!
//! Everything is written to stderr so that subtitles streamed to stdout stay clean.

use anyhow::Result;
use owo_colors::OwoColorize;
use std::fmt;
use std::io::IsTerminal;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::{self, FormatEvent, FormatFields};
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::registry::LookupSpan;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogStyle {
    /// Icon and message only
    Compact,
    #[default]
    Pretty,
    /// Adds spans and file/line numbers
    Verbose,
}

impl std::str::FromStr for LogStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" => Ok(LogStyle::Compact),
            "pretty" => Ok(LogStyle::Pretty),
            "verbose" => Ok(LogStyle::Verbose),
            _ => Err(format!("Invalid log style '{}'. Expected: compact, pretty, or verbose", s)),
        }
    }
}

pub mod icons {
    pub const TRACE: &str = "·";
    pub const DEBUG: &str = "●";
    pub const INFO: &str = "✓";
    pub const WARN: &str = "⚠";
    pub const ERROR: &str = "✕";
}

fn level_icon(level: Level) -> &'static str {
    match level {
        Level::TRACE => icons::TRACE,
        Level::DEBUG => icons::DEBUG,
        Level::INFO => icons::INFO,
        Level::WARN => icons::WARN,
        Level::ERROR => icons::ERROR,
    }
}

pub struct PrettyFormatter<T> {
    timer: T,
    use_ansi: bool,
    style: LogStyle,
}

impl<T> PrettyFormatter<T> {
    pub fn new(timer: T) -> Self {
        Self {
            timer,
            use_ansi: std::io::stderr().is_terminal(),
            style: LogStyle::Pretty,
        }
    }

    pub fn with_ansi(mut self, use_ansi: bool) -> Self {
        self.use_ansi = use_ansi;
        self
    }

    pub fn with_style(mut self, style: LogStyle) -> Self {
        self.style = style;
        self
    }

    fn write_level(&self, writer: &mut format::Writer<'_>, level: Level) -> fmt::Result {
        let label = match self.style {
            LogStyle::Compact => level_icon(level).to_string(),
            _ => format!("{} {}", level_icon(level), level),
        };
        if !self.use_ansi {
            return write!(writer, "{label}");
        }
        match level {
            Level::TRACE => write!(writer, "{}", label.dimmed()),
            Level::DEBUG => write!(writer, "{}", label.blue()),
            Level::INFO => write!(writer, "{}", label.green()),
            Level::WARN => write!(writer, "{}", label.yellow()),
            Level::ERROR => write!(writer, "{}", label.red().bold()),
        }
    }
}

impl<S, N, T> FormatEvent<S, N> for PrettyFormatter<T>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
    T: FormatTime,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();

        self.timer.format_time(&mut writer)?;
        write!(writer, " ")?;
        self.write_level(&mut writer, *meta.level())?;

        if self.style != LogStyle::Compact {
            if self.use_ansi {
                write!(writer, " {}", meta.target().dimmed())?;
            } else {
                write!(writer, " {}", meta.target())?;
            }
        }

        if self.style == LogStyle::Verbose {
            if let Some(scope) = ctx.event_scope() {
                for span in scope.from_root() {
                    if self.use_ansi {
                        write!(writer, " {}", format!("{}:", span.name()).cyan())?;
                    } else {
                        write!(writer, " {}:", span.name())?;
                    }
                }
            }
            if let (Some(file), Some(line)) = (meta.file(), meta.line()) {
                let short_file = file.rsplit('/').next().unwrap_or(file);
                if self.use_ansi {
                    write!(writer, " {}", format!("{}:{}", short_file, line).dimmed())?;
                } else {
                    write!(writer, " {}:{}", short_file, line)?;
                }
            }
        }

        write!(writer, " ")?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Installs the global subscriber. `RUST_LOG` wins over `level` when set.
pub fn init(level: &str, style: LogStyle, json: bool) -> Result<()> {
    use tracing_subscriber::fmt::time::ChronoLocal;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;
    let timer = ChronoLocal::new("%Y-%m-%d %H:%M:%S%.3f".to_string());

    let layer = if json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_timer(timer)
            .with_file(true)
            .with_line_number(true)
            .with_target(true)
            .with_writer(std::io::stderr)
            .with_filter(filter)
            .boxed()
    } else {
        let formatter = PrettyFormatter::new(timer)
            .with_ansi(std::io::stderr().is_terminal())
            .with_style(style);
        tracing_subscriber::fmt::layer()
            .event_format(formatter)
            .with_writer(std::io::stderr)
            .with_filter(filter)
            .boxed()
    };

    tracing_subscriber::registry().with(layer).init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn render(style: LogStyle) -> String {
        let capture = Capture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .event_format(PrettyFormatter::new(()).with_ansi(false).with_style(style))
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let span = tracing::info_span!("bin", input = "talk.json");
            let _enter = span.enter();
            tracing::info!("binned transcript");
        });

        let bytes = capture.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn log_style_from_str() {
        assert_eq!(LogStyle::from_str("compact").unwrap(), LogStyle::Compact);
        assert_eq!(LogStyle::from_str("pretty").unwrap(), LogStyle::Pretty);
        assert_eq!(LogStyle::from_str("VERBOSE").unwrap(), LogStyle::Verbose);
        assert!(LogStyle::from_str("loud").is_err());
    }

    #[test]
    fn level_icons() {
        assert_eq!(level_icon(Level::INFO), icons::INFO);
        assert_eq!(level_icon(Level::WARN), icons::WARN);
        assert_eq!(level_icon(Level::ERROR), icons::ERROR);
    }

    #[test]
    fn verbose_style_names_the_enclosing_span() {
        let out = render(LogStyle::Verbose);
        assert!(out.contains(" bin: "), "{out}");
        assert!(out.contains("logging.rs:"), "{out}");
        assert!(out.contains("binned transcript"), "{out}");
    }

    #[test]
    fn pretty_style_leaves_spans_out() {
        let out = render(LogStyle::Pretty);
        assert!(!out.contains(" bin: "), "{out}");
        assert!(out.contains("binned transcript"), "{out}");
    }
}
