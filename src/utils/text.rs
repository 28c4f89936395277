use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static regex"));

static SYMBOLS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s.,;?!@\-_+()/#]").expect("static regex"));

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("static regex")
});

/// Collapse whitespace runs to a single space and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

/// Drop everything except word characters, whitespace and basic punctuation.
pub fn strip_symbols(text: &str) -> String {
    SYMBOLS.replace_all(text, "").into_owned()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextCleaner {
    pub strip_symbols: bool,
}

impl TextCleaner {
    pub fn new(strip_symbols: bool) -> Self {
        Self { strip_symbols }
    }

    pub fn clean(&self, text: &str) -> String {
        let text = normalize_whitespace(text);
        if self.strip_symbols {
            // 移除符號後可能留下多餘空白
            normalize_whitespace(&strip_symbols(&text))
        } else {
            text
        }
    }
}

/// Lower-cased address when it looks like an e-mail, `None` otherwise.
pub fn normalize_email(raw: &str) -> Option<String> {
    let email = raw.trim().to_lowercase();
    if email.is_empty() {
        return None;
    }
    if EMAIL.is_match(&email) {
        Some(email)
    } else {
        tracing::warn!("Invalid email format found: {}", email);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  Acme \n\t Corp  "), "Acme Corp");
        assert_eq!(normalize_whitespace(""), "");
        assert_eq!(normalize_whitespace(" \n "), "");
    }

    #[test]
    fn test_cleaner_keeps_symbols_by_default() {
        let cleaner = TextCleaner::default();
        assert_eq!(cleaner.clean(" Müller & Söhne: GmbH "), "Müller & Söhne: GmbH");
    }

    #[test]
    fn test_cleaner_strips_symbols_when_enabled() {
        let cleaner = TextCleaner::new(true);
        assert_eq!(cleaner.clean(" Müller & Söhne: GmbH "), "Müller Söhne GmbH");
        assert_eq!(cleaner.clean("+49 (0) 89/123-45"), "+49 (0) 89/123-45");
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(
            normalize_email("  Jane.Doe@Example.COM "),
            Some("jane.doe@example.com".to_string())
        );
        assert_eq!(normalize_email("not-an-email"), None);
        assert_eq!(normalize_email("jane@localhost"), None);
        assert_eq!(normalize_email(""), None);
    }
}
