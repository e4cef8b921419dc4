// Path validation for the proxy - allow-list first, traversal checks second

// Upstream path prefixes the proxy is willing to forward
pub const ALLOWED_PATHS: [&str; 5] = ["/maps", "/data", "/tiles", "/fonts", "/geocoding"];

// Maximum allowed path length
pub const MAX_PATH_LENGTH: usize = 256;

// Why a path was refused. The client only ever sees a generic 400;
// the precise reason goes to the server log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathRejection {
    Empty,
    TooLong,
    PrefixNotAllowed,
    Traversal,
}

impl std::fmt::Display for PathRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "path is empty"),
            Self::TooLong => write!(f, "path exceeds {} characters", MAX_PATH_LENGTH),
            Self::PrefixNotAllowed => write!(f, "path prefix is not on the allow-list"),
            Self::Traversal => write!(f, "path contains a traversal sequence"),
        }
    }
}

// Validate a caller-supplied upstream path. Rules are applied in order and
// the first failing rule decides the rejection reason.
pub fn validate_path(path: &str) -> Result<&str, PathRejection> {
    if path.is_empty() {
        return Err(PathRejection::Empty);
    }

    if path.len() > MAX_PATH_LENGTH {
        return Err(PathRejection::TooLong);
    }

    if !ALLOWED_PATHS.iter().any(|allowed| path.starts_with(allowed)) {
        return Err(PathRejection::PrefixNotAllowed);
    }

    // the allow-list already pins the prefix; this is defense-in-depth
    if path.contains("..") || path.contains('\\') {
        return Err(PathRejection::Traversal);
    }

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_each_allowed_prefix() {
        for prefix in ALLOWED_PATHS {
            let path = format!("{}/style.json", prefix);
            assert_eq!(validate_path(&path), Ok(path.as_str()));
        }
    }

    #[test]
    fn rejects_empty_path() {
        assert_eq!(validate_path(""), Err(PathRejection::Empty));
    }

    #[test]
    fn rejects_oversized_path() {
        let path = format!("/tiles/{}", "a".repeat(300));
        assert_eq!(validate_path(&path), Err(PathRejection::TooLong));
    }

    #[test]
    fn accepts_path_at_length_limit() {
        let path = format!("/tiles/{}", "a".repeat(MAX_PATH_LENGTH - "/tiles/".len()));
        assert_eq!(path.len(), MAX_PATH_LENGTH);
        assert!(validate_path(&path).is_ok());
    }

    #[test]
    fn rejects_unknown_prefix() {
        assert_eq!(validate_path("/unknown/x"), Err(PathRejection::PrefixNotAllowed));
        assert_eq!(validate_path("/secrets/key"), Err(PathRejection::PrefixNotAllowed));
        assert_eq!(validate_path("tiles/0/0/0.png"), Err(PathRejection::PrefixNotAllowed));
    }

    #[test]
    fn rejects_traversal_even_with_allowed_prefix() {
        assert_eq!(validate_path("/tiles/../../etc"), Err(PathRejection::Traversal));
        assert_eq!(validate_path("/maps/../secret"), Err(PathRejection::Traversal));
        assert_eq!(validate_path("/fonts\\windows"), Err(PathRejection::Traversal));
    }

    #[test]
    fn length_check_wins_over_traversal() {
        let path = format!("/tiles/../{}", "a".repeat(300));
        assert_eq!(validate_path(&path), Err(PathRejection::TooLong));
    }
}
