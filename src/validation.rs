use thiserror::Error;

const MAX_PARAM_LEN: usize = 128;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid {name}: {value:?}")]
    InvalidParameter { name: &'static str, value: String },
}

/// Heights, hashes, txids and addresses are all plain ASCII alphanumerics.
/// Anything else (`/`, `?`, `#`, `.`, `%`) could steer the upstream URL.
pub fn validate_path_param(name: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::MissingParameter(name));
    }

    if value.len() > MAX_PARAM_LEN || !value.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(ValidationError::InvalidParameter {
            name,
            value: value.to_string(),
        });
    }

    Ok(())
}
