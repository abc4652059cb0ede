use super::errors::SessionError;

/// Session names become file names; reject anything that could escape the
/// sessions directory.
pub fn validate_session_name(name: &str) -> Result<(), SessionError> {
    let reason = if name.trim().is_empty() {
        Some("name cannot be empty")
    } else if name == "." || name == ".." {
        Some("name cannot be a relative directory")
    } else if name.contains('/') || name.contains('\\') {
        Some("name cannot contain path separators")
    } else if name.contains('\0') {
        Some("name cannot contain NUL bytes")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(SessionError::InvalidName {
            name: name.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert!(validate_session_name("xsession-default").is_ok());
        assert!(validate_session_name("work 2").is_ok());
        assert!(validate_session_name(".hidden").is_ok());
    }

    #[test]
    fn test_invalid_names() {
        for name in ["", "   ", ".", "..", "a/b", "../etc", "a\\b", "nul\0"] {
            let result = validate_session_name(name);
            assert!(
                matches!(result, Err(SessionError::InvalidName { .. })),
                "expected '{}' to be rejected",
                name.escape_debug()
            );
        }
    }
}
