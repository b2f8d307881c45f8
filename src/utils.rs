use std::error::Error;

/// `true` for empty or whitespace-only strings.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Formats `count` followed by the singular or plural noun, e.g. `1 folder`, `3 folders`.
pub fn pluralize(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

/// Renders an error followed by every `source()` in its chain, separated by `": "`.
///
/// [`std::fmt::Display`] on our error types only describes the failing operation,
/// the underlying cause (permission denied, disk full, ...) lives in the chain.
pub fn error_chain(error: &dyn Error) -> String {
    let mut text = error.to_string();
    let mut cause = error.source();

    while let Some(inner) = cause {
        let inner_text = inner.to_string();
        // transparent wrappers repeat their source's message
        if !text.ends_with(&inner_text) {
            text.push_str(": ");
            text.push_str(&inner_text);
        }
        cause = inner.source();
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{FileOperation, IoError};

    #[test]
    fn blank_detects_whitespace_only() {
        assert!(is_blank(""));
        assert!(is_blank("   \t"));
        assert!(!is_blank(" Art "));
    }

    #[test]
    fn pluralize_picks_noun_by_count() {
        assert_eq!(pluralize(0, "folder", "folders"), "0 folders");
        assert_eq!(pluralize(1, "folder", "folders"), "1 folder");
        assert_eq!(pluralize(2, "folder", "folders"), "2 folders");
    }

    #[test]
    fn error_chain_includes_io_cause() {
        let error = IoError::new(
            FileOperation::Mkdir,
            "Assets/Demo".into(),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied"),
        );

        assert_eq!(
            error_chain(&error),
            "I/O error: creating a directory on path 'Assets/Demo': permission denied"
        );
    }
}
