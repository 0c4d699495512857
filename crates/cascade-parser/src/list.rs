//! Splitting property values on separators.
//!
//! Separators inside quotes, inside parentheses or after a backslash do not
//! split, so `url(a,b)` or `"a b"` stay whole.

/// Split `value` on any of `separators`, trimming each piece.
///
/// Empty pieces are dropped, except the final one when `last` is set.
pub fn split<'v>(value: &'v str, separators: &[char], last: bool) -> Vec<&'v str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut parens = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, ch) in value.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (ch, quote) {
            ('\\', _) => escaped = true,
            (c, Some(q)) if c == q => quote = None,
            (_, Some(_)) => {}
            ('"' | '\'', None) => quote = Some(ch),
            ('(', None) => parens += 1,
            (')', None) => parens = parens.saturating_sub(1),
            (c, None) if parens == 0 && separators.contains(&c) => {
                let piece = &value[start..i];
                if !piece.is_empty() {
                    pieces.push(piece.trim());
                }
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }

    let rest = &value[start..];
    if last || !rest.is_empty() {
        pieces.push(rest.trim());
    }
    pieces
}

/// Split a space-separated value such as `margin` or `background`.
pub fn space(value: &str) -> Vec<&str> {
    split(value, &[' ', '\n', '\t'], false)
}

/// Split a comma-separated value such as `transition` or `font-family`.
pub fn comma(value: &str) -> Vec<&str> {
    split(value, &[','], true)
}
