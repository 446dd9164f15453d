use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    ConfigurationError {
        msg: String,
    },
    // The remote document service rejected a call.
    ServiceError {
        status: String,
        msg: String,
        root_cause: String,
    },
    DatabaseNotFoundError {
        name: String,
    },
    GenericError {
        msg: String,
    },
}

pub type Result<T> = std::result::Result<T, AppError>;

impl std::error::Error for AppError {}

impl AppError {
    /// Message of the innermost error that caused this one.
    pub fn root_cause(&self) -> String {
        match self {
            AppError::ServiceError { root_cause, .. } => root_cause.clone(),
            _ => self.message(),
        }
    }

    /// Top-level message without the variant prefix.
    pub fn message(&self) -> String {
        match self {
            AppError::ConfigurationError { msg } => msg.clone(),
            AppError::ServiceError { msg, .. } => msg.clone(),
            AppError::DatabaseNotFoundError { name } => format!(
                "Database {} does not exist. Please try another database",
                name
            ),
            AppError::GenericError { msg } => msg.clone(),
        }
    }

    /// The single diagnostic line printed when a run fails.
    pub fn report_line(&self) -> String {
        match self {
            AppError::ServiceError {
                status,
                msg,
                root_cause,
            } => format!("{} error occurred: {}, Message: {}", status, msg, root_cause),
            _ => format!("Error: {}, Message: {}", self.message(), self.root_cause()),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::ConfigurationError { msg } => write!(f, "Configuration Error: '{}'", msg),
            AppError::ServiceError { status, msg, .. } => {
                write!(f, "Document Service Error ({}): '{}'", status, msg)
            }
            AppError::DatabaseNotFoundError { .. } => {
                write!(f, "Database Not Found Error: '{}'", self.message())
            }
            AppError::GenericError { msg } => write!(f, "Generic Error: '{}'", msg),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::GenericError { msg: e.to_string() }
    }
}
