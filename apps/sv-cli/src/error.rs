use sv_explore::ExploreError;
use sv_pipeline::PipelineError;
use sv_results::ResultsError;
use sv_solver::ResolveError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Pipeline(#[from] PipelineError),

    #[error("Resolve error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("{0}")]
    Explore(#[from] ExploreError),

    #[error("{0}")]
    Results(#[from] ResultsError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Usage(String),
}

pub type CliResult<T> = Result<T, CliError>;
