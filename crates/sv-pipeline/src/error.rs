use sv_mission::MissionError;
use sv_solver::ResolveError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid configuration: {what}")]
    InvalidConfig { what: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type PipelineResult<T> = Result<T, PipelineError>;

impl From<ResolveError> for PipelineError {
    fn from(e: ResolveError) -> Self {
        PipelineError::InvalidConfig {
            what: format!("resolver: {e}"),
        }
    }
}

impl From<MissionError> for PipelineError {
    fn from(e: MissionError) -> Self {
        PipelineError::InvalidConfig {
            what: format!("mission: {e}"),
        }
    }
}
