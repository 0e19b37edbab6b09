/// Broad failure category of an [`AppError`].
///
/// Each kind maps to a stable process exit code so scripts can tell a bad flag
/// from a series that is simply too short to model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad parameters or malformed input (exit code 2).
    InvalidConfiguration,
    /// File system failures (exit code 2).
    Io,
    /// History too short for the requested model (exit code 3).
    InsufficientData,
    /// The statistical model could not be fitted (exit code 4).
    ModelFit,
}

impl ErrorKind {
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::InvalidConfiguration | ErrorKind::Io => 2,
            ErrorKind::InsufficientData => 3,
            ErrorKind::ModelFit => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    kind: ErrorKind,
    message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidConfiguration, message)
    }

    pub fn insufficient_data(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InsufficientData, message)
    }

    pub fn model_fit(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ModelFit, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn exit_code(&self) -> u8 {
        self.kind.exit_code()
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("kind", &self.kind)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_kind() {
        assert_eq!(AppError::invalid_config("x").exit_code(), 2);
        assert_eq!(AppError::io("x").exit_code(), 2);
        assert_eq!(AppError::insufficient_data("x").exit_code(), 3);
        assert_eq!(AppError::model_fit("x").exit_code(), 4);
    }

    #[test]
    fn display_is_the_bare_message() {
        let err = AppError::invalid_config("Periods must be > 0.");
        assert_eq!(err.to_string(), "Periods must be > 0.");
        assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
    }
}
