//! Route-string validation applied before any provider hook runs.

use thiserror::Error;

/// A route string rejected by the adapter layer.
///
/// This is the only failure the adapter itself can produce; everything else
/// is the provider's to report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("route is empty")]
    Empty,

    #[error("route {0:?} must begin with '/'")]
    MissingLeadingSlash(String),

    #[error("route {route:?} contains forbidden character {character:?}")]
    ForbiddenCharacter { route: String, character: char },
}

/// Checks that `route` is a plausible route string: non-empty, rooted at `/`,
/// and free of whitespace and control characters.
///
/// Pattern syntax (`:param` captures, `*` wildcards) is deliberately not
/// inspected — which patterns are legal is a per-provider concern.
pub fn validate_route(route: &str) -> Result<(), RouteError> {
    if route.is_empty() {
        return Err(RouteError::Empty);
    }
    if !route.starts_with('/') {
        return Err(RouteError::MissingLeadingSlash(route.to_owned()));
    }
    if let Some(character) = route.chars().find(|c| c.is_whitespace() || c.is_control()) {
        return Err(RouteError::ForbiddenCharacter {
            route: route.to_owned(),
            character,
        });
    }
    Ok(())
}
