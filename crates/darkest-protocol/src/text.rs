//! Byte-length limits for outbound chat text.
//!
//! The server announces the largest chat message it accepts (`chat_max`)
//! in bytes, not characters. Text has to be cut to fit before it goes
//! into a payload, and the cut must land on a character boundary or the
//! server receives broken UTF-8.

/// Returns the longest prefix of `text` whose UTF-8 encoding fits in
/// `max_bytes`.
///
/// Never splits a multi-byte character: if the limit falls inside one,
/// the whole character is dropped. Text that already fits is returned
/// unchanged, and a limit of `0` gives an empty string.
///
/// ```
/// use darkest_protocol::truncate_utf8_safe;
///
/// // "é" is 2 bytes, so 5 bytes holds two of them plus half a third.
/// assert_eq!(truncate_utf8_safe(5, "éééé"), "éé");
/// assert_eq!(truncate_utf8_safe(100, "short"), "short");
/// ```
pub fn truncate_utf8_safe(max_bytes: usize, text: &str) -> &str {
    if text.len() <= max_bytes {
        return text;
    }

    // `is_char_boundary(0)` is always true, so this terminates.
    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_two_byte_chars_drops_partial_char() {
        assert_eq!(truncate_utf8_safe(5, "éééé"), "éé");
        assert_eq!(truncate_utf8_safe(4, "éééé"), "éé");
        assert_eq!(truncate_utf8_safe(3, "éééé"), "é");
    }

    #[test]
    fn test_truncate_fitting_input_is_unchanged() {
        assert_eq!(truncate_utf8_safe(5, "hello"), "hello");
        assert_eq!(truncate_utf8_safe(4096, "hello"), "hello");
        assert_eq!(truncate_utf8_safe(0, ""), "");
    }

    #[test]
    fn test_truncate_zero_limit_returns_empty() {
        assert_eq!(truncate_utf8_safe(0, "hello"), "");
        assert_eq!(truncate_utf8_safe(0, "é"), "");
    }

    #[test]
    fn test_truncate_ascii_cuts_at_exact_byte() {
        assert_eq!(truncate_utf8_safe(3, "abcdef"), "abc");
    }

    #[test]
    fn test_truncate_four_byte_char_never_split() {
        let text = "a🦊b";
        assert_eq!(truncate_utf8_safe(1, text), "a");
        assert_eq!(truncate_utf8_safe(2, text), "a");
        assert_eq!(truncate_utf8_safe(4, text), "a");
        assert_eq!(truncate_utf8_safe(5, text), "a🦊");
    }

    #[test]
    fn test_truncate_result_is_prefix_within_limit() {
        let inputs = ["", "plain ascii", "éèê", "日本語のテキスト", "mixed é 🦊 text"];
        for input in inputs {
            for max in 0..=input.len() + 2 {
                let out = truncate_utf8_safe(max, input);
                assert!(out.len() <= max, "{input:?} at {max}");
                assert!(input.starts_with(out), "{input:?} at {max}");
            }
        }
    }
}
