use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormgenError {
    #[error("unknown area identifier: {0}")]
    UnknownArea(String),
}
