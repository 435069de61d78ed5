/// Escapes text for a single-quoted PHP string literal.
pub fn php_str(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Escapes text for a single-quoted JavaScript string literal.
pub fn js_str(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_quotes_and_backslashes() {
        assert_eq!(php_str(r"a'b\c"), r"a\'b\\c");
        assert_eq!(js_str("it's\nfine"), "it\\'s\\nfine");
        assert_eq!(php_str("分类"), "分类");
    }
}
