use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Invalid encoding: `{0}`")]
    InvalidEncoding(String),
}
