pub mod events;
pub mod security;
pub mod subscriptions;
pub mod users;
pub mod venues;

use uuid::Uuid;

use crate::errors::ApiError;

/// The single ownership capability check: writes to an owned entity are
/// allowed only for the user who created it. Reads never pass through here.
pub fn ensure_write_access(principal: Uuid, owner_id: Uuid) -> Result<(), ApiError> {
    if principal == owner_id {
        Ok(())
    } else {
        Err(ApiError::permission_denied())
    }
}

/// Translates an `ordering` query parameter (comma-separated field names,
/// `-` prefix for descending) into an ORDER BY clause body. Field names are
/// resolved against an allow-list of (api name, sql column) pairs; anything
/// unknown is dropped. Falls back to `default` when nothing survives.
pub fn parse_ordering(requested: Option<&str>, allowed: &[(&str, &str)], default: &str) -> String {
    let Some(requested) = requested else {
        return default.to_string();
    };

    let clauses: Vec<String> = requested
        .split(',')
        .filter_map(|raw| {
            let field = raw.trim();
            let (name, direction) = match field.strip_prefix('-') {
                Some(rest) => (rest, "DESC"),
                None => (field, "ASC"),
            };
            allowed
                .iter()
                .find(|(api, _)| *api == name)
                .map(|(_, column)| format!("{} {}", column, direction))
        })
        .collect();

    if clauses.is_empty() {
        default.to_string()
    } else {
        clauses.join(", ")
    }
}
