/// Known UTF-8 -> GBK -> UTF-8 round-trip damage seen in upstream company names.
const MOJIBAKE: &[(char, char)] = &[('羹', 'ü'), ('脛', 'ä'), ('枚', 'ö'), ('脽', 'ß')];

/// Clean a text field for CSV output.
///
/// Repairs the known mojibake characters and strips NUL, DEL and every
/// other ASCII control character.
pub fn clean_text(text: &str) -> String {
    text.chars()
        .filter_map(|c| {
            if let Some((_, fixed)) = MOJIBAKE.iter().find(|(broken, _)| *broken == c) {
                return Some(*fixed);
            }
            if (c as u32) < 32 || c as u32 == 127 {
                None
            } else {
                Some(c)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_control_characters() {
        assert_eq!(clean_text("Acme\0 Corp\u{0007}\n"), "Acme Corp");
        assert_eq!(clean_text("Tab\tSeparated\u{007f}"), "TabSeparated");
    }

    #[test]
    fn test_repairs_mojibake() {
        assert_eq!(clean_text("M羹nchener R羹ck"), "Münchener Rück");
        assert_eq!(clean_text("Stra脽e"), "Straße");
    }

    #[test]
    fn test_leaves_clean_text_alone() {
        assert_eq!(clean_text("Nestlé S.A."), "Nestlé S.A.");
    }
}
