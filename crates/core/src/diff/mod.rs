#![forbid(unsafe_code)]

//! Line-based unified diff.
//!
//! Lines keep their terminators (see [`split_lines_keep_ends`]), so concatenating the `' '`/`-` lines of a
//! hunk reproduces the old text and the `' '`/`+` lines the new text.

mod myers;
mod unified;

pub use myers::{OpTag, Opcode, opcodes};
pub use unified::{DEFAULT_CONTEXT, unified_diff};

/// Splits at line boundaries, keeping each terminator. `\r\n` is one
/// boundary; a lone `\r`, `\n`, vertical tab, form feed, the ASCII
/// separators `\x1c`..`\x1e`, NEL and the Unicode line/paragraph separators
/// are the others. A trailing fragment without a terminator is its own line;
/// the empty string has no lines.
pub fn split_lines_keep_ends(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((at, ch)) = chars.next() {
        if !is_line_boundary(ch) {
            continue;
        }
        let mut end = at + ch.len_utf8();
        if ch == '\r' && chars.next_if(|&(_, next)| next == '\n').is_some() {
            end += 1;
        }
        lines.push(&text[start..end]);
        start = end;
    }

    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

/// The line with its terminator removed.
pub fn strip_line_end(line: &str) -> &str {
    line.strip_suffix("\r\n")
        .or_else(|| line.strip_suffix(is_line_boundary))
        .unwrap_or(line)
}

fn is_line_boundary(ch: char) -> bool {
    matches!(
        ch,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e'
            | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

#[cfg(test)]
mod tests;
