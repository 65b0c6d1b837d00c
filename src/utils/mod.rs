//! Utility functions and helpers.

pub mod date;
pub mod log;

/// Display placeholder for empty text values.
pub fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() { "-" } else { value }
}

/// Mask a secret for display, keeping only its length hint.
pub fn mask(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => "*".repeat(v.chars().count().min(8)),
        _ => "(not set)".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_or_dash() {
        assert_eq!(or_dash(""), "-");
        assert_eq!(or_dash("  "), "-");
        assert_eq!(or_dash("Lager"), "Lager");
    }

    #[test]
    fn test_mask() {
        assert_eq!(mask(None), "(not set)");
        assert_eq!(mask(Some("")), "(not set)");
        assert_eq!(mask(Some("abc")), "***");
        assert_eq!(mask(Some("a-very-long-password")), "********");
    }
}
