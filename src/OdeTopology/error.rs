use thiserror::Error;

/// error types of the ODE -> reaction topology conversion
#[derive(Debug, Error)]
pub enum OdeTopoError {
    #[error("Cannot parse expression '{input}': {message}")]
    Parse { input: String, message: String },
    #[error("Malformed term '{0}': nothing left after stripping coefficients and operators")]
    MalformedTerm(String),
    #[error("Line {line_no} is not of the form 'name = value': '{line}'")]
    MalformedLine { line_no: usize, line: String },
    #[error("{species} species declared but {equations} ODEs given")]
    LengthMismatch { species: usize, equations: usize },
    #[error("Species '{0}' is declared more than once")]
    DuplicateSpecies(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
    #[error("Logger error: {0}")]
    Logger(#[from] log::SetLoggerError),
}

impl OdeTopoError {
    pub(crate) fn parse(input: &str, message: impl Into<String>) -> Self {
        OdeTopoError::Parse {
            input: input.to_string(),
            message: message.into(),
        }
    }
}
