//! Error-tracking records.
//!
//! Records go through `tracing` under the `diagnostics` target so a collector
//! can route them separately from the access log. Bearer tokens are attached
//! by prefix only.

/// Number of leading token characters kept on a record.
const TOKEN_PREFIX_LEN: usize = 12;

pub fn token_tag(token: Option<&str>) -> String {
    match token {
        Some(token) if !token.is_empty() => token.chars().take(TOKEN_PREFIX_LEN).collect(),
        _ => "-".to_string(),
    }
}

/// The remote validator could not be reached.
pub fn report_upstream(route: &str, token: Option<&str>, error: &str) {
    tracing::error!(
        target: "diagnostics",
        route,
        token = %token_tag(token),
        error,
        "token validator unavailable"
    );
}

/// A handler panicked and the request was answered with a 500.
pub fn report_panic(method: &str, path: &str, token: Option<&str>, message: &str) {
    tracing::error!(
        target: "diagnostics",
        method,
        path,
        token = %token_tag(token),
        panic = message,
        "request handler panicked"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_tag_keeps_a_short_prefix() {
        assert_eq!(token_tag(Some("eyJhbGciOiJIUzI1NiJ9.payload.sig")), "eyJhbGciOiJI");
        assert_eq!(token_tag(Some("short")), "short");
        assert_eq!(token_tag(None), "-");
        assert_eq!(token_tag(Some("")), "-");
    }
}
