use thiserror::Error;

pub const LIVE_PRICES_UNAVAILABLE: &str =
    "Unable to fetch live prices. Please check your connection.";

pub const SELECTION_REQUIRED: &str =
    "Selection required: Please choose your country and city first.";

#[derive(Error, Debug)]
pub enum ShopError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Service returned HTTP {status}: {body}")]
    ServiceError { status: u16, body: String },

    #[error("{}", LIVE_PRICES_UNAVAILABLE)]
    LivePricesUnavailable { cause: String },

    #[error("{}", SELECTION_REQUIRED)]
    MissingSelection { field: String },

    #[error("Unknown country '{value}'")]
    UnknownCountry { value: String },

    #[error("A search is already in progress")]
    SearchInProgress,

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Service,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ShopError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ShopError::MissingSelection { .. }
            | ShopError::UnknownCountry { .. }
            | ShopError::SearchInProgress => ErrorCategory::Input,
            ShopError::MissingConfigError { .. }
            | ShopError::InvalidConfigValueError { .. }
            | ShopError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            ShopError::ApiError(_)
            | ShopError::ServiceError { .. }
            | ShopError::SerializationError(_)
            | ShopError::LivePricesUnavailable { .. } => ErrorCategory::Service,
            ShopError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Service => ErrorSeverity::Medium,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Message shown to the user. Every service-side failure reads the same.
    pub fn user_friendly_message(&self) -> String {
        match self {
            ShopError::MissingSelection { .. } => SELECTION_REQUIRED.to_string(),
            ShopError::UnknownCountry { value } => format!(
                "'{}' is not a supported country. Use --list-locations to see the choices.",
                value
            ),
            ShopError::SearchInProgress => {
                "A search is already running. Wait for it to finish.".to_string()
            }
            ShopError::ApiError(_)
            | ShopError::ServiceError { .. }
            | ShopError::SerializationError(_)
            | ShopError::LivePricesUnavailable { .. } => LIVE_PRICES_UNAVAILABLE.to_string(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => "Pass --country and --city (see --list-locations)",
            ErrorCategory::Configuration => {
                "Check the config file and the GEMINI_API_KEY environment variable"
            }
            ErrorCategory::Service => "Check your network connection and API quota, then retry",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }

    /// Collapses any failure raised while talking to the model into the single
    /// user-facing service error, keeping the original text for diagnostics.
    pub fn into_live_prices_unavailable(self) -> ShopError {
        match self {
            already @ ShopError::LivePricesUnavailable { .. } => already,
            other => ShopError::LivePricesUnavailable {
                cause: other.to_string(),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, ShopError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_errors_share_one_message() {
        let status = ShopError::ServiceError {
            status: 429,
            body: "quota".to_string(),
        };
        let collapsed = status.into_live_prices_unavailable();

        assert_eq!(collapsed.to_string(), LIVE_PRICES_UNAVAILABLE);
        assert_eq!(collapsed.user_friendly_message(), LIVE_PRICES_UNAVAILABLE);
        match collapsed {
            ShopError::LivePricesUnavailable { cause } => assert!(cause.contains("429")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_selection_error_is_input_category() {
        let err = ShopError::MissingSelection {
            field: "city".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.user_friendly_message(), SELECTION_REQUIRED);
        assert_eq!(err.severity(), ErrorSeverity::High);
    }
}
