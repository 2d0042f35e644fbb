use url::Url;

/// Boundary validation failures. These never reach the pipeline error state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("enter a URL to clone")]
    EmptyUrl,
    #[error("'{0}' is not a valid http(s) URL")]
    InvalidUrl(String),
    #[error("enter an edit instruction")]
    EmptyInstruction,
}

/// Trims and parses a user-entered URL; only `http` and `https` are accepted.
pub fn validate_url(raw: &str) -> Result<Url, InputError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InputError::EmptyUrl);
    }
    let parsed = Url::parse(trimmed).map_err(|_| InputError::InvalidUrl(trimmed.to_string()))?;
    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => Ok(parsed),
        _ => Err(InputError::InvalidUrl(trimmed.to_string())),
    }
}

/// Accepts any instruction that is non-empty after trimming.
///
/// The returned slice is the caller's text unchanged; the transcript keeps what
/// the user typed.
pub fn validate_instruction(raw: &str) -> Result<&str, InputError> {
    if raw.trim().is_empty() {
        Err(InputError::EmptyInstruction)
    } else {
        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_must_be_http_or_https() {
        assert!(validate_url("https://example.com").is_ok());
        assert!(validate_url("  http://example.com/a  ").is_ok());
        assert_eq!(validate_url("   "), Err(InputError::EmptyUrl));
        assert_eq!(
            validate_url("ftp://example.com"),
            Err(InputError::InvalidUrl("ftp://example.com".into()))
        );
        assert_eq!(
            validate_url("example.com"),
            Err(InputError::InvalidUrl("example.com".into()))
        );
    }

    #[test]
    fn instruction_keeps_original_text() {
        assert_eq!(validate_instruction(" make it red "), Ok(" make it red "));
        assert_eq!(validate_instruction(" \n\t"), Err(InputError::EmptyInstruction));
    }
}
