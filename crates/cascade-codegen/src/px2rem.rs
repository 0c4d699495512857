/// Pixel to rem rewriting for declaration values
///
/// `<n>px` becomes `<n / root_value>rem`, computed by exact decimal long
/// division. Strings, comments and `url(...)` bodies are copied untouched.

use std::borrow::Cow;

/// Extra fraction digits kept beyond those of the input before rounding.
const EXTRA_DIGITS: usize = 8;

/// Rewrite every px length in `value`. Returns the input unchanged (borrowed)
/// when there is nothing to convert.
pub fn px_to_rem(value: &str, root_value: u32) -> Cow<'_, str> {
    if root_value == 0 || !contains_px(value) {
        return Cow::Borrowed(value);
    }

    let bytes = value.as_bytes();
    let mut out = String::with_capacity(value.len());
    let mut i = 0;
    let mut copied = 0;

    while i < bytes.len() {
        match bytes[i] {
            quote @ (b'"' | b'\'') => i = skip_string(bytes, i, quote),
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = find(bytes, i + 2, b"*/").map_or(bytes.len(), |end| end + 2);
            }
            b'u' | b'U' if is_url_start(bytes, i) => {
                i = skip_url(bytes, i + 4);
            }
            _ => match parse_px(bytes, i) {
                Some(length) => {
                    out.push_str(&value[copied..length.start]);
                    out.push_str(&convert(&length, root_value));
                    i = length.end;
                    copied = i;
                }
                None => i += 1,
            },
        }
    }
    out.push_str(&value[copied..]);
    Cow::Owned(out)
}

fn contains_px(value: &str) -> bool {
    value
        .as_bytes()
        .windows(2)
        .any(|w| w.eq_ignore_ascii_case(b"px"))
}

/// A `<number>px` found in the value
#[derive(Debug, PartialEq, Eq)]
struct PxLength<'v> {
    /// Byte offset of the sign or first digit
    start: usize,
    /// Byte offset after `px`
    end: usize,
    negative: bool,
    int_digits: &'v [u8],
    frac_digits: &'v [u8],
}

#[inline]
fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'#' | b'%' | b'.' | b'\\') || b >= 0x80
}

fn parse_px(bytes: &[u8], at: usize) -> Option<PxLength<'_>> {
    let starts_number = bytes[at].is_ascii_digit()
        || (bytes[at] == b'.' && bytes.get(at + 1).is_some_and(u8::is_ascii_digit));
    if !starts_number {
        return None;
    }

    let mut start = at;
    let mut negative = false;
    if at > 0 {
        let prev = bytes[at - 1];
        if matches!(prev, b'-' | b'+') {
            // A sign only counts when it is not glued to an identifier
            if at >= 2 && is_ident_byte(bytes[at - 2]) {
                return None;
            }
            start = at - 1;
            negative = prev == b'-';
        } else if is_ident_byte(prev) {
            return None;
        }
    }

    let int_end = digits_end(bytes, at);
    let (frac_digits, number_end) =
        if bytes.get(int_end) == Some(&b'.') && bytes.get(int_end + 1).is_some_and(u8::is_ascii_digit) {
            let frac_end = digits_end(bytes, int_end + 1);
            (&bytes[int_end + 1..frac_end], frac_end)
        } else {
            (&bytes[int_end..int_end], int_end)
        };

    let unit = bytes.get(number_end..number_end + 2)?;
    if !unit.eq_ignore_ascii_case(b"px") {
        return None;
    }
    let end = number_end + 2;
    if bytes.get(end).is_some_and(|&b| is_ident_byte(b)) {
        return None;
    }

    Some(PxLength {
        start,
        end,
        negative,
        int_digits: &bytes[at..int_end],
        frac_digits,
    })
}

fn digits_end(bytes: &[u8], from: usize) -> usize {
    bytes[from..]
        .iter()
        .position(|b| !b.is_ascii_digit())
        .map_or(bytes.len(), |rel| from + rel)
}

/// Divide the length by `root_value` and format it as rem.
fn convert(length: &PxLength<'_>, root_value: u32) -> String {
    let divisor = u64::from(root_value);
    let max_frac = length.frac_digits.len() + EXTRA_DIGITS;

    let mut int_part: Vec<u8> = Vec::with_capacity(length.int_digits.len());
    let mut remainder: u64 = 0;
    for &digit in length.int_digits {
        remainder = remainder * 10 + u64::from(digit - b'0');
        int_part.push((remainder / divisor) as u8);
        remainder %= divisor;
    }

    let mut frac_part: Vec<u8> = Vec::with_capacity(max_frac);
    let mut input_frac = length.frac_digits.iter();
    while frac_part.len() < max_frac {
        let next = input_frac.next().map_or(0, |&d| u64::from(d - b'0'));
        if remainder == 0 && next == 0 && input_frac.len() == 0 {
            break;
        }
        remainder = remainder * 10 + next;
        frac_part.push((remainder / divisor) as u8);
        remainder %= divisor;
    }

    // Round half up on what is left
    if remainder * 2 >= divisor && remainder != 0 {
        round_up(&mut int_part, &mut frac_part);
    }

    while frac_part.last() == Some(&0) {
        frac_part.pop();
    }
    let first_nonzero = int_part.iter().position(|&d| d != 0);
    let int_part = first_nonzero.map_or(&[][..], |i| &int_part[i..]);

    if int_part.is_empty() && frac_part.is_empty() {
        return "0".to_string();
    }

    let mut out = String::with_capacity(int_part.len() + frac_part.len() + 5);
    if length.negative {
        out.push('-');
    }
    if int_part.is_empty() {
        out.push('0');
    }
    out.extend(int_part.iter().map(|&d| char::from(b'0' + d)));
    if !frac_part.is_empty() {
        out.push('.');
        out.extend(frac_part.iter().map(|&d| char::from(b'0' + d)));
    }
    out.push_str("rem");
    out
}

fn round_up(int_part: &mut Vec<u8>, frac_part: &mut [u8]) {
    for digit in frac_part.iter_mut().rev() {
        if *digit == 9 {
            *digit = 0;
        } else {
            *digit += 1;
            return;
        }
    }
    for digit in int_part.iter_mut().rev() {
        if *digit == 9 {
            *digit = 0;
        } else {
            *digit += 1;
            return;
        }
    }
    int_part.insert(0, 1);
}

fn skip_string(bytes: &[u8], start: usize, quote: u8) -> usize {
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

fn is_url_start(bytes: &[u8], at: usize) -> bool {
    let glued = at > 0 && is_ident_byte(bytes[at - 1]);
    !glued
        && bytes
            .get(at..at + 4)
            .is_some_and(|w| w.eq_ignore_ascii_case(b"url("))
}

/// Skip a `url(` body starting after the paren, returning the offset after `)`.
fn skip_url(bytes: &[u8], from: usize) -> usize {
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            quote @ (b'"' | b'\'') => i = skip_string(bytes, i, quote),
            b')' => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

fn find(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    bytes
        .get(from..)?
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|rel| from + rel)
}
