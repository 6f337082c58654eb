use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RibovizResult<T> = Result<T, RibovizError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RibovizErrorCategory {
    Success,
    InputValidationError,
    IoSystemError,
    ComputationError,
    InternalError,
}

impl RibovizErrorCategory {
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::InputValidationError => 2,
            Self::IoSystemError => 3,
            Self::ComputationError => 4,
            Self::InternalError => 5,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::InputValidationError => "InputValidationError",
            Self::IoSystemError => "IoSystemError",
            Self::ComputationError => "ComputationError",
            Self::InternalError => "InternalError",
        }
    }

    pub const fn is_fatal(self) -> bool {
        !matches!(self, Self::Success)
    }
}

/// Error surfaced at the command boundary.
///
/// The placeholder is a stable dotted tag (`INPUT.CONFIG_PARSE`, `RUN.WORKFLOW`)
/// that scripts can match on without parsing the free-form message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RibovizError {
    category: RibovizErrorCategory,
    placeholder: &'static str,
    message: String,
}

impl RibovizError {
    pub fn new(
        category: RibovizErrorCategory,
        placeholder: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            placeholder,
            message: message.into(),
        }
    }

    pub fn input_validation(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(
            RibovizErrorCategory::InputValidationError,
            placeholder,
            message,
        )
    }

    pub fn io_system(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(RibovizErrorCategory::IoSystemError, placeholder, message)
    }

    pub fn computation(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(RibovizErrorCategory::ComputationError, placeholder, message)
    }

    pub fn internal(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(RibovizErrorCategory::InternalError, placeholder, message)
    }

    pub const fn category(&self) -> RibovizErrorCategory {
        self.category
    }

    pub const fn placeholder(&self) -> &'static str {
        self.placeholder
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn exit_code(&self) -> i32 {
        self.category.exit_code()
    }

    pub fn diagnostic_line(&self) -> String {
        let severity = if self.category.is_fatal() {
            "ERROR"
        } else {
            "INFO"
        };
        format!("{}: [{}] {}", severity, self.placeholder, self.message)
    }

    pub fn fatal_exit_line(&self) -> Option<String> {
        self.category
            .is_fatal()
            .then(|| format!("FATAL EXIT CODE: {}", self.exit_code()))
    }
}

impl Display for RibovizError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {}",
            self.category.as_str(),
            self.placeholder,
            self.message
        )
    }
}

impl Error for RibovizError {}

#[cfg(test)]
mod tests {
    use super::{RibovizError, RibovizErrorCategory};

    #[test]
    fn exit_codes_follow_category() {
        let cases = [
            (RibovizErrorCategory::Success, 0),
            (RibovizErrorCategory::InputValidationError, 2),
            (RibovizErrorCategory::IoSystemError, 3),
            (RibovizErrorCategory::ComputationError, 4),
            (RibovizErrorCategory::InternalError, 5),
        ];

        for (category, exit_code) in cases {
            assert_eq!(category.exit_code(), exit_code, "{}", category.as_str());
        }
    }

    #[test]
    fn fatal_error_renders_diagnostic_lines() {
        let error = RibovizError::input_validation(
            "INPUT.CONFIG_TYPE",
            "parameter 'dedup_umis' expected a boolean, found string",
        );

        assert_eq!(error.exit_code(), 2);
        assert_eq!(
            error.diagnostic_line(),
            "ERROR: [INPUT.CONFIG_TYPE] parameter 'dedup_umis' expected a boolean, found string"
        );
        assert_eq!(
            error.fatal_exit_line().as_deref(),
            Some("FATAL EXIT CODE: 2")
        );
    }

    #[test]
    fn success_category_has_no_fatal_line() {
        let info = RibovizError::new(RibovizErrorCategory::Success, "OK", "done");
        assert_eq!(info.diagnostic_line(), "INFO: [OK] done");
        assert!(info.fatal_exit_line().is_none());
    }
}
