/// Whitespace compaction for minimized output
///
/// Comments are dropped (a comment separates like whitespace), whitespace
/// runs collapse to one space, and spaces next to punctuation that does not
/// need them are removed. Quoted strings and escaped characters are copied
/// as written.

/// Characters that never need whitespace around them in a selector.
const SELECTOR_TIGHT: &[char] = &[',', '>', '+', '~'];

/// Compact a selector: `a > b , c` becomes `a>b,c`.
pub fn selector(text: &str) -> String {
    compact(text, SELECTOR_TIGHT, SELECTOR_TIGHT)
}

/// Compact a declaration value: `rgb( 0 , 0 , 0 )` becomes `rgb(0,0,0)`.
pub fn value(text: &str) -> String {
    compact(text, &[',', ')'], &[',', '('])
}

/// Compact at-rule params. Same rules as values.
pub fn params(text: &str) -> String {
    value(text)
}

/// Collapse whitespace in `text`.
///
/// A pending space is dropped when the next character is in `no_space_before`
/// or the last written character is in `no_space_after`.
fn compact(text: &str, no_space_before: &[char], no_space_after: &[char]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    let mut chars = text.char_indices().peekable();

    while let Some((i, ch)) = chars.next() {
        if ch.is_whitespace() {
            pending_space = true;
            continue;
        }
        if ch == '/' && text[i + 1..].starts_with('*') {
            let body = i + 2;
            let end = text[body..].find("*/").map_or(text.len(), |rel| body + rel + 2);
            while chars.peek().is_some_and(|&(j, _)| j < end) {
                chars.next();
            }
            pending_space = true;
            continue;
        }

        if pending_space && !out.is_empty() {
            let after_tight = out.chars().next_back().is_some_and(|c| no_space_after.contains(&c));
            if !after_tight && !no_space_before.contains(&ch) {
                out.push(' ');
            }
        }
        pending_space = false;

        match ch {
            '\\' => {
                out.push(ch);
                if let Some((_, escaped)) = chars.next() {
                    out.push(escaped);
                }
            }
            '"' | '\'' => {
                out.push(ch);
                while let Some((_, c)) = chars.next() {
                    out.push(c);
                    if c == '\\' {
                        if let Some((_, escaped)) = chars.next() {
                            out.push(escaped);
                        }
                    } else if c == ch {
                        break;
                    }
                }
            }
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_combinators() {
        assert_eq!(selector("a > b"), "a>b");
        assert_eq!(selector("a  +  b ~ c"), "a+b~c");
        assert_eq!(selector("a ,\n b"), "a,b");
        assert_eq!(selector("  .nav  li  a "), ".nav li a");
    }

    #[test]
    fn test_selector_keeps_strings_and_escapes() {
        assert_eq!(selector("[title=\"a  >  b\"] > c"), "[title=\"a  >  b\"]>c");
        assert_eq!(selector(".a\\ b  c"), ".a\\ b c");
    }

    #[test]
    fn test_selector_drops_comments() {
        assert_eq!(selector("a /* x */ b"), "a b");
        assert_eq!(selector("a/* x */,b"), "a,b");
    }

    #[test]
    fn test_value() {
        assert_eq!(value("rgb( 0 , 0 , 0 )"), "rgb(0,0,0)");
        assert_eq!(value("1px  solid\n red"), "1px solid red");
        assert_eq!(value("calc(1px + 2px)"), "calc(1px + 2px)");
        assert_eq!(value("\"a  b\" , c"), "\"a  b\",c");
        assert_eq!(value("red /* why */"), "red");
    }

    #[test]
    fn test_params() {
        assert_eq!(params("screen  and ( min-width : 100px )"), "screen and (min-width : 100px)");
        assert_eq!(params("print ,  screen"), "print,screen");
    }
}
