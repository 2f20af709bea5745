use validator::ValidationError;

/// Validates that a slug only uses URL-safe characters (letters, digits,
/// hyphens and underscores).
pub fn validate_slug_format(slug: &str) -> Result<(), ValidationError> {
    if slug.is_empty()
        || !slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::new("invalid_slug"));
    }
    Ok(())
}
