//! RFC 5545 content-line text handling: value escaping and line folding.

/// Maximum octets per physical line, excluding the CRLF.
pub const MAX_LINE_OCTETS: usize = 75;

/// Escapes a TEXT value.
///
/// Backslash, newline, semicolon and comma are escaped. CRLF and a lone CR
/// count as one newline. Doing it in a single pass is what keeps the
/// backslashes introduced here from being escaped again.
pub fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + value.len() / 8);
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push_str("\\n");
            }
            '\n' => out.push_str("\\n"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            _ => out.push(c),
        }
    }
    out
}

/// Folds one content line so no physical line exceeds [`MAX_LINE_OCTETS`].
///
/// Continuation lines start with a single space, which counts toward the
/// limit. A fold never splits a UTF-8 sequence: the boundary backs off to
/// the previous character start instead.
pub fn fold_line(line: &str) -> String {
    if line.len() <= MAX_LINE_OCTETS {
        return line.to_string();
    }

    let mut out = String::with_capacity(line.len() + 3 * (line.len() / (MAX_LINE_OCTETS - 1)));
    let mut rest = line;
    let mut budget = MAX_LINE_OCTETS;

    while !rest.is_empty() {
        let mut cut = rest.len().min(budget);
        while !rest.is_char_boundary(cut) {
            cut -= 1;
        }
        if budget < MAX_LINE_OCTETS {
            out.push_str("\r\n ");
        }
        out.push_str(&rest[..cut]);
        rest = &rest[cut..];
        budget = MAX_LINE_OCTETS - 1;
    }
    out
}

/// Reverses [`fold_line`]: removes every CRLF followed by one space.
#[cfg(test)]
pub(crate) fn unfold(text: &str) -> String {
    text.replace("\r\n ", "")
}
