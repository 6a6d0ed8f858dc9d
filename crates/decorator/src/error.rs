use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DecoratorBuildError {
    #[error("wrapping callback must be set")]
    MissingCallback,

    #[error("invalid decorator name: {reason}")]
    InvalidName { reason: String },
}

impl DecoratorBuildError {
    pub fn invalid_name<S: ToString>(str: S) -> Self {
        Self::InvalidName { reason: str.to_string() }
    }
}
