//! Markdown token insertion around a text selection.

/// Result of wrapping a selection in a token pair.
///
/// `start` and `end` are the selection anchors to restore once the new
/// text is in place, counted in chars like the input offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

/// Wrap `text[start..end]` (char offsets) in `prefix` and `suffix`.
///
/// Both anchors move forward by the prefix length only, so the selection
/// still covers the originally selected text inside the new wrapper. With an
/// empty selection the caret lands between prefix and suffix.
///
/// Returns `None` when the range is out of order or past the end of `text`.
///
/// # Example
///
/// ```
/// use prompt_writer::editor::insert;
///
/// let out = insert("hello world", 0, 5, "**", "**").unwrap();
/// assert_eq!(out.text, "**hello** world");
/// assert_eq!((out.start, out.end), (2, 7));
/// ```
pub fn insert(text: &str, start: usize, end: usize, prefix: &str, suffix: &str) -> Option<Insertion> {
    if start > end {
        return None;
    }
    let start_byte = char_to_byte(text, start)?;
    let end_byte = char_to_byte(text, end)?;

    let mut out = String::with_capacity(text.len() + prefix.len() + suffix.len());
    out.push_str(&text[..start_byte]);
    out.push_str(prefix);
    out.push_str(&text[start_byte..end_byte]);
    out.push_str(suffix);
    out.push_str(&text[end_byte..]);

    let shift = prefix.chars().count();
    Some(Insertion {
        text: out,
        start: start + shift,
        end: end + shift,
    })
}

/// Byte index of the `char_idx`-th char, allowing the one-past-the-end index.
fn char_to_byte(text: &str, char_idx: usize) -> Option<usize> {
    text.char_indices()
        .map(|(byte, _)| byte)
        .chain(std::iter::once(text.len()))
        .nth(char_idx)
}

/// The markdown constructs offered by the editor toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkdownToken {
    Bold,
    Italic,
    Heading1,
    Heading2,
    Heading3,
    BulletList,
    NumberedList,
    Link,
    InlineCode,
    CodeBlock,
    Quote,
}

impl MarkdownToken {
    /// Every token, in toolbar order.
    pub const ALL: [Self; 11] = [
        Self::Bold,
        Self::Italic,
        Self::Heading1,
        Self::Heading2,
        Self::Heading3,
        Self::BulletList,
        Self::NumberedList,
        Self::Link,
        Self::InlineCode,
        Self::CodeBlock,
        Self::Quote,
    ];

    /// The (prefix, suffix) pair inserted around the selection.
    pub const fn pair(self) -> (&'static str, &'static str) {
        match self {
            Self::Bold => ("**", "**"),
            Self::Italic => ("*", "*"),
            Self::Heading1 => ("# ", ""),
            Self::Heading2 => ("## ", ""),
            Self::Heading3 => ("### ", ""),
            Self::BulletList => ("- ", ""),
            Self::NumberedList => ("1. ", ""),
            Self::Link => ("[", "](url)"),
            Self::InlineCode => ("`", "`"),
            Self::CodeBlock => ("```\n", "\n```"),
            Self::Quote => ("> ", ""),
        }
    }

    /// Short toolbar label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bold => "B",
            Self::Italic => "I",
            Self::Heading1 => "H1",
            Self::Heading2 => "H2",
            Self::Heading3 => "H3",
            Self::BulletList => "• List",
            Self::NumberedList => "1. List",
            Self::Link => "Link",
            Self::InlineCode => "Code",
            Self::CodeBlock => "Code Block",
            Self::Quote => "Quote",
        }
    }

    /// Key chord shown next to the label.
    pub const fn shortcut(self) -> &'static str {
        match self {
            Self::Bold => "^B",
            Self::Italic => "M-i",
            Self::Heading1 => "M-1",
            Self::Heading2 => "M-2",
            Self::Heading3 => "M-3",
            Self::BulletList => "M-l",
            Self::NumberedList => "M-n",
            Self::Link => "^K",
            Self::InlineCode => "M-c",
            Self::CodeBlock => "M-b",
            Self::Quote => "M-q",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_wraps_selection_and_shifts_anchors_by_prefix() {
        let out = insert("hello world", 0, 5, "**", "**").unwrap();
        assert_eq!(out.text, "**hello** world");
        assert_eq!(out.start, 2);
        assert_eq!(out.end, 7);
    }

    #[test]
    fn test_empty_buffer_with_prefix_only() {
        let out = insert("", 0, 0, "# ", "").unwrap();
        assert_eq!(out.text, "# ");
        assert_eq!((out.start, out.end), (2, 2));
    }

    #[test]
    fn test_empty_selection_puts_caret_between_tokens() {
        let out = insert("ab", 1, 1, "`", "`").unwrap();
        assert_eq!(out.text, "a``b");
        assert_eq!((out.start, out.end), (2, 2));
    }

    #[test]
    fn test_end_anchor_ignores_suffix_length() {
        let out = insert("see docs", 4, 8, "[", "](url)").unwrap();
        assert_eq!(out.text, "see [docs](url)");
        assert_eq!((out.start, out.end), (5, 9));
    }

    #[test]
    fn test_multiline_code_block_token() {
        let (prefix, suffix) = MarkdownToken::CodeBlock.pair();
        let out = insert("let x = 1;", 0, 10, prefix, suffix).unwrap();
        assert_eq!(out.text, "```\nlet x = 1;\n```");
        assert_eq!((out.start, out.end), (4, 14));
    }

    #[test]
    fn test_offsets_count_chars_not_bytes() {
        let out = insert("héllo", 1, 2, "*", "*").unwrap();
        assert_eq!(out.text, "h*é*llo");
        assert_eq!((out.start, out.end), (2, 3));
    }

    #[test]
    fn test_selection_at_end_of_text() {
        let out = insert("abc", 3, 3, "> ", "").unwrap();
        assert_eq!(out.text, "abc> ");
        assert_eq!((out.start, out.end), (5, 5));
    }

    #[test]
    fn test_reversed_range_is_rejected() {
        assert_eq!(insert("abc", 2, 1, "*", "*"), None);
    }

    #[test]
    fn test_range_past_end_is_rejected() {
        assert_eq!(insert("abc", 0, 4, "*", "*"), None);
    }

    #[test]
    fn test_every_token_has_a_nonempty_prefix() {
        for token in MarkdownToken::ALL {
            assert!(!token.pair().0.is_empty(), "{token:?}");
        }
    }

    proptest! {
        #[test]
        fn prop_length_grows_by_token_lengths(
            text in "\\PC{0,40}",
            a in 0usize..48,
            b in 0usize..48,
            prefix in "\\PC{0,4}",
            suffix in "\\PC{0,4}",
        ) {
            let len = text.chars().count();
            let (start, end) = (a.min(b).min(len), a.max(b).min(len));
            let out = insert(&text, start, end, &prefix, &suffix).unwrap();

            prop_assert_eq!(
                out.text.chars().count(),
                len + prefix.chars().count() + suffix.chars().count()
            );
            prop_assert!(out.start <= out.end);
            prop_assert_eq!(out.start, start + prefix.chars().count());
            prop_assert_eq!(out.end, end + prefix.chars().count());

            let selected: String = text.chars().skip(start).take(end - start).collect();
            let kept: String = out.text.chars().skip(out.start).take(out.end - out.start).collect();
            prop_assert_eq!(selected, kept);
        }
    }
}
