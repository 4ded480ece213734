pub mod auth;
pub mod dashboard;
pub mod inventory;
pub mod profile;
pub mod reports;
pub mod sales;

use axum::response::Redirect;

/// Redirect back to a view with a transient error message in the query
/// string; the view renders it as a notice and the form stays usable for a
/// manual retry.
pub(crate) fn flash(path: &str, message: &str) -> Redirect {
    Redirect::to(&format!("{}?error={}", path, urlencoding::encode(message)))
}

/// Assembles the urlencoded query-string pairs a sort link has to preserve.
/// Empty values are dropped.
pub(crate) fn query_string(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_string_encodes_and_drops_empty_pairs() {
        let q = query_string(&[("q", "desk lamp"), ("category", ""), ("status", "pending")]);
        assert_eq!(q, "q=desk%20lamp&status=pending");
    }
}
