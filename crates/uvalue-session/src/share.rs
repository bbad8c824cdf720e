//! Shareable design locators

/// Query parameter carrying a saved design's public id
pub const SHARE_PARAM: &str = "design";

/// Locator that reopens a saved design: `{base}?design={public_id}`
pub fn share_locator(base: &str, public_id: &str) -> String {
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{}{}{}={}", base, separator, SHARE_PARAM, public_id)
}

/// Extract the shared design id from a query string or full locator
pub fn parse_share_param(input: &str) -> Option<String> {
    let query = match input.split_once('?') {
        Some((_, query)) => query,
        None => input,
    };
    let query = query.split('#').next().unwrap_or_default();

    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == SHARE_PARAM)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_locator() {
        assert_eq!(
            share_locator("https://uvalue.example/", "abc123"),
            "https://uvalue.example/?design=abc123"
        );
        assert_eq!(
            share_locator("https://uvalue.example/?lang=en", "abc123"),
            "https://uvalue.example/?lang=en&design=abc123"
        );
    }

    #[test]
    fn test_parse_share_param() {
        assert_eq!(parse_share_param("?design=abc123"), Some("abc123".to_string()));
        assert_eq!(parse_share_param("lang=en&design=abc123"), Some("abc123".to_string()));
        assert_eq!(
            parse_share_param("https://uvalue.example/?design=abc123#results"),
            Some("abc123".to_string())
        );
        assert_eq!(parse_share_param("?design="), None);
        assert_eq!(parse_share_param("?designer=abc"), None);
        assert_eq!(parse_share_param(""), None);
    }

    #[test]
    fn test_locator_parses_back() {
        let locator = share_locator("http://localhost:3000/", "x9Y8z7");
        assert_eq!(parse_share_param(&locator).as_deref(), Some("x9Y8z7"));
    }
}
