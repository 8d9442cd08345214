use unicode_width::UnicodeWidthStr;

/// Terminal columns the text occupies.
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// A horizontal rule at least `min` columns wide and as wide as `heading`.
pub fn rule(ch: char, min: usize, heading: &str) -> String {
    let width = display_width(heading).max(min);
    std::iter::repeat_n(ch, width).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_width() {
        assert_eq!(display_width("ENTITY: orders"), 14);
        assert_eq!(display_width("ENTITY: 注文"), 12);
    }

    #[test]
    fn test_rule_min_width() {
        assert_eq!(rule('-', 30, "ENTITY: User"), "-".repeat(30));
    }

    #[test]
    fn test_rule_follows_wide_heading() {
        let heading = format!("ENTITY: {}", "顧客注文明細履歴テーブル".repeat(2));
        assert_eq!(rule('-', 30, &heading).len(), display_width(&heading));
    }
}
