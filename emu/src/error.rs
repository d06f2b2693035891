use arch::error::CodecError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("Out of program: pc = {pc}, program has {len} word(s)")]
    OutOfProgram { pc: usize, len: usize },

    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Failure to load a dump configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to open `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config `{path}`: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}
