//! Cleanup for text shown in the terminal.
//!
//! Only used for display. Prompts are built from the raw record text.

/// Strip common encoding artifacts and control characters.
///
/// - `Â` directly before a Latin-1 punctuation/symbol character (the
///   signature of UTF-8 read as Latin-1) is dropped
/// - non-breaking spaces become plain spaces
/// - U+FFFD and control characters other than newline and tab are removed
pub fn sanitize_display_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\u{00C2}' if chars.peek().is_some_and(is_latin1_symbol) => {}
            '\u{00A0}' => out.push(' '),
            '\u{FFFD}' => {}
            '\n' | '\t' => out.push(c),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }

    out
}

fn is_latin1_symbol(c: &char) -> bool {
    ('\u{0080}'..='\u{00BF}').contains(c)
}
