use validator::{ValidateEmail, ValidationError};

/// Optional URL fields are stored as empty strings when blank.
pub fn validate_blank_or_url(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Ok(());
    }
    match url::Url::parse(value) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        _ => {
            let mut error = ValidationError::new("url");
            error.message = Some("Must be a valid http(s) URL or left blank".into());
            Err(error)
        }
    }
}

pub fn validate_blank_or_email(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.validate_email() {
        Ok(())
    } else {
        let mut error = ValidationError::new("email");
        error.message = Some("Must be a valid email address or left blank".into());
        Err(error)
    }
}

/// Raised when a stored enum column holds an unexpected value.
#[derive(Debug, derive_more::Display)]
#[display("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl std::error::Error for UnknownVariant {}
