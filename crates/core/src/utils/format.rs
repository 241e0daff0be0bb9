/// Compact USD amount for summaries: `$3.4T`, `$512.0B`, `$75.3M`, `$950000`.
pub fn format_large_number(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1e12 {
        format!("${:.1}T", value / 1e12)
    } else if abs >= 1e9 {
        format!("${:.1}B", value / 1e9)
    } else if abs >= 1e6 {
        format!("${:.1}M", value / 1e6)
    } else {
        format!("${:.0}", value)
    }
}

/// Truncate to at most `max_chars` characters, appending `...` when cut.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_large_number() {
        assert_eq!(format_large_number(3.42e12), "$3.4T");
        assert_eq!(format_large_number(512e9), "$512.0B");
        assert_eq!(format_large_number(75_300_000.0), "$75.3M");
        assert_eq!(format_large_number(950_000.0), "$950000");
    }

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate("Apple Inc.", 20), "Apple Inc.");
        assert_eq!(truncate("Nestlé Société Anonyme", 10), "Nestlé ...");
    }
}
