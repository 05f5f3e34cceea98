use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExploreError {
    #[error("Invalid design space: {what}")]
    InvalidSpace { what: String },

    #[error("Invalid sampler: {what}")]
    InvalidSampler { what: String },

    #[error("Invalid explorer setting: {what}")]
    InvalidSetting { what: &'static str },
}

pub type ExploreResult<T> = Result<T, ExploreError>;
