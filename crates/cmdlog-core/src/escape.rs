//! Key code rendering
//!
//! Every key code the editor can report has exactly one display form:
//!
//! - `0..=126` come from a fixed table: control characters as vim-style
//!   mnemonics (`<C-A>`, `<ESC>`, `<NUL>`), printable ASCII as itself
//! - codes listed in the special key table render as `<LABEL>`
//! - everything else renders as `<0xHEX>` using the code's 32-bit pattern
//!
//! Rendering is total: no code is ever rejected.

use cmdlog_config::{default_special_keys, SpecialKey};
use std::borrow::Cow;

/// Raw key code as delivered by the editor's input decoder
pub type KeyCode = i32;

/// Display strings for codes `0..=126`
const ASCII_NAMES: [&str; 127] = [
    "<NUL>", "<C-A>", "<C-B>", "<C-C>", "<C-D>", "<C-E>", "<C-F>", "<C-G>",
    "<C-H>", "<C-I>", "<NL>", "<C-K>", "<C-L>", "<C-M>", "<C-N>", "<C-O>",
    "<C-P>", "<C-Q>", "<C-R>", "<C-S>", "<C-T>", "<C-U>", "<C-V>", "<C-W>",
    "<C-X>", "<C-Y>", "<C-Z>", "<ESC>", "<C-\\>", "<C-]>", "<C-^>", "<C-_>",
    " ", "!", "\"", "#", "$", "%", "&", "'", "(", ")", "*", "+", ",", "-", ".", "/",
    "0", "1", "2", "3", "4", "5", "6", "7", "8", "9", ":", ";", "<", "=", ">", "?",
    "@", "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O",
    "P", "Q", "R", "S", "T", "U", "V", "W", "X", "Y", "Z", "[", "\\", "]", "^", "_",
    "`", "a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l", "m", "n", "o",
    "p", "q", "r", "s", "t", "u", "v", "w", "x", "y", "z", "{", "|", "}", "~",
];

/// Render a code through the fixed ASCII table or the hex fallback
///
/// Ignores special keys; use [`EscapeTable::escape`] for the full mapping.
pub fn escape_ascii(code: KeyCode) -> Cow<'static, str> {
    match usize::try_from(code).ok().and_then(|i| ASCII_NAMES.get(i)) {
        Some(name) => Cow::Borrowed(name),
        None => Cow::Owned(hex_escape(code)),
    }
}

fn in_ascii_table(code: KeyCode) -> bool {
    (0..ASCII_NAMES.len() as KeyCode).contains(&code)
}

fn hex_escape(code: KeyCode) -> String {
    format!("<0x{:X}>", code)
}

/// Immutable code-to-text mapping, including the special key table
#[derive(Debug, Clone)]
pub struct EscapeTable {
    special: Vec<(KeyCode, String)>,
}

impl EscapeTable {
    /// Build a table from configured special keys
    pub fn new(special_keys: &[SpecialKey]) -> Self {
        // The ASCII table always wins for 0..=126
        let special = special_keys
            .iter()
            .filter(|key| !in_ascii_table(key.code as KeyCode))
            .map(|key| (key.code as KeyCode, format!("<{}>", key.label)))
            .collect();
        Self { special }
    }

    /// Render one key code
    pub fn escape(&self, code: KeyCode) -> Cow<'_, str> {
        if in_ascii_table(code) {
            return escape_ascii(code);
        }
        match self.special.iter().find(|(c, _)| *c == code) {
            Some((_, rendered)) => Cow::Borrowed(rendered.as_str()),
            None => Cow::Owned(hex_escape(code)),
        }
    }

    /// Map one rendered token back to its key code
    ///
    /// Accepts exactly the strings [`escape`](Self::escape) produces.
    pub fn unescape(&self, token: &str) -> Option<KeyCode> {
        if let Some(i) = ASCII_NAMES.iter().position(|name| *name == token) {
            return Some(i as KeyCode);
        }
        if let Some((code, _)) = self.special.iter().find(|(_, r)| r == token) {
            return Some(*code);
        }
        let hex = token.strip_prefix("<0x")?.strip_suffix('>')?;
        let code = u32::from_str_radix(hex, 16).ok()? as KeyCode;
        // Reject spellings escape() would never produce, e.g. <0x41> or <0x0FF>
        (hex_escape(code) == token && self.escape(code) == token).then_some(code)
    }

    /// Split an escaped payload into the tokens that produced it
    ///
    /// A `<` only starts a multi-character token when the bracketed text is
    /// something [`escape`](Self::escape) can produce; otherwise it is the
    /// literal `<` key.
    pub fn split_tokens<'a>(&self, payload: &'a str) -> Vec<&'a str> {
        let mut tokens = Vec::new();
        let mut rest = payload;

        while let Some(first) = rest.chars().next() {
            let mut len = first.len_utf8();
            if first == '<' {
                if let Some(end) = rest[1..].find('>') {
                    let candidate = &rest[..end + 2];
                    if self.unescape(candidate).is_some() {
                        len = candidate.len();
                    }
                }
            }
            tokens.push(&rest[..len]);
            rest = &rest[len..];
        }

        tokens
    }

    /// Decode an escaped payload back into key codes
    ///
    /// Returns `None` if any token is not something this table renders.
    pub fn decode(&self, payload: &str) -> Option<Vec<KeyCode>> {
        self.split_tokens(payload)
            .into_iter()
            .map(|token| self.unescape(token))
            .collect()
    }
}

impl Default for EscapeTable {
    fn default() -> Self {
        Self::new(&default_special_keys())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmdlog_config::{BACKSPACE_CODE, DELETE_CODE};
    use proptest::prelude::*;

    #[test]
    fn control_characters_use_mnemonics() {
        let table = EscapeTable::default();
        assert_eq!(table.escape(0), "<NUL>");
        assert_eq!(table.escape(1), "<C-A>");
        assert_eq!(table.escape(10), "<NL>");
        assert_eq!(table.escape(13), "<C-M>");
        assert_eq!(table.escape(21), "<C-U>");
        assert_eq!(table.escape(27), "<ESC>");
        assert_eq!(table.escape(28), "<C-\\>");
        assert_eq!(table.escape(31), "<C-_>");
    }

    #[test]
    fn printable_ascii_is_literal() {
        let table = EscapeTable::default();
        for code in 32..=126 {
            let expected = char::from(code as u8).to_string();
            assert_eq!(table.escape(code), expected.as_str());
        }
    }

    #[test]
    fn del_byte_is_not_in_table() {
        let table = EscapeTable::default();
        assert_eq!(table.escape(127), "<0x7F>");
    }

    #[test]
    fn special_keys() {
        let table = EscapeTable::default();
        assert_eq!(table.escape(BACKSPACE_CODE as KeyCode), "<BS>");
        assert_eq!(table.escape(DELETE_CODE as KeyCode), "<DEL>");
    }

    #[test]
    fn hex_fallback_is_uppercase_minimal_width() {
        let table = EscapeTable::default();
        assert_eq!(table.escape(0x80), "<0x80>");
        assert_eq!(table.escape(0x1abc), "<0x1ABC>");
        assert_eq!(table.escape(-1), "<0xFFFFFFFF>");
    }

    #[test]
    fn custom_special_table() {
        let table = EscapeTable::new(&[SpecialKey::new(0x200, "F1")]);
        assert_eq!(table.escape(0x200), "<F1>");
        assert_eq!(table.escape(BACKSPACE_CODE as KeyCode), "<0xFFFF9D95>");
    }

    #[test]
    fn split_recognises_known_tokens() {
        let table = EscapeTable::default();
        assert_eq!(
            table.split_tokens("ia<ESC>:wq<C-M>"),
            vec!["i", "a", "<ESC>", ":", "w", "q", "<C-M>"]
        );
    }

    #[test]
    fn split_keeps_literal_angle_brackets() {
        let table = EscapeTable::default();
        assert_eq!(table.split_tokens("<<>"), vec!["<", "<", ">"]);
        assert_eq!(table.split_tokens("<foo>"), vec!["<", "f", "o", "o", ">"]);
        assert_eq!(table.split_tokens("<0x41>"), vec!["<", "0", "x", "4", "1", ">"]);
    }

    #[test]
    fn decode_example() {
        let table = EscapeTable::default();
        assert_eq!(table.decode("a<C-A>"), Some(vec![97, 1]));
        assert_eq!(table.decode("x<BS>"), Some(vec![120, BACKSPACE_CODE as KeyCode]));
    }

    proptest! {
        #[test]
        fn escape_is_total_and_pure(code in any::<i32>()) {
            let table = EscapeTable::default();
            let first = table.escape(code).into_owned();
            prop_assert!(!first.is_empty());
            prop_assert_eq!(table.escape(code), first.as_str());
        }

        #[test]
        fn single_code_unescapes(code in any::<i32>()) {
            let table = EscapeTable::default();
            let rendered = table.escape(code).into_owned();
            prop_assert_eq!(table.unescape(&rendered), Some(code));
        }

        // A typed '<' followed by e.g. "C-A>" is indistinguishable from <C-A>
        #[test]
        fn sequences_decode(
            codes in prop::collection::vec(any::<i32>().prop_filter("literal '<'", |c| *c != 60), 0..40)
        ) {
            let table = EscapeTable::default();
            let payload: String = codes.iter().map(|c| table.escape(*c).into_owned()).collect();
            prop_assert_eq!(table.decode(&payload), Some(codes));
        }
    }
}
