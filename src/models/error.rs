use thiserror::Error;

/// Raw input that cannot become a model value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("Invalid format input: {0}")]
    InvalidFormatInput(String),

    #[error("Invalid player: {0}")]
    InvalidPlayer(String),
}
