use thiserror::Error;

pub type Result<T> = std::result::Result<T, CueError>;

#[derive(Debug, Error)]
pub enum CueError {
    #[error("invalid bin size {value}: must be a positive duration")]
    InvalidBinSize { value: String },

    #[error("invalid config: {message}")]
    InvalidConfig { message: String },

    #[error("I/O error while {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("SRT error while {context}: {message}")]
    Srt {
        context: &'static str,
        message: String,
    },

    #[error("JSON parse error while {context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("TOML parse error while {context}: {source}")]
    Toml {
        context: &'static str,
        #[source]
        source: toml::de::Error,
    },
}

impl CueError {
    pub(crate) fn invalid_bin_size(value: impl std::fmt::Display) -> Self {
        Self::InvalidBinSize {
            value: value.to_string(),
        }
    }

    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    pub(crate) fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }

    pub(crate) fn srt(context: &'static str, message: impl std::fmt::Display) -> Self {
        Self::Srt {
            context,
            message: message.to_string(),
        }
    }

    pub(crate) fn json(context: &'static str, source: serde_json::Error) -> Self {
        Self::Json { context, source }
    }

    pub(crate) fn toml(context: &'static str, source: toml::de::Error) -> Self {
        Self::Toml { context, source }
    }
}
