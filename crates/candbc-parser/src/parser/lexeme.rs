//! Token-level primitives of the DBC grammar.
//!
//! Every primitive skips leading whitespace (and `//` line comments,
//! which are not part of the official format but show up in the wild)
//! and consumes nothing when it does not match, so callers can probe
//! freely. The one exception is [`string`]: once the opening quote has
//! been seen the cursor stays inside the literal even when it turns out
//! to be unterminated.
//!
//! All character classes are plain ASCII. The numeric scanners parse
//! the longest valid prefix, independent of any process locale.

use crate::source::Source;

/// Reserved words of the format. A name that collides with one of these
/// is rejected wherever a fresh name is expected, and terminates
/// open-ended identifier lists.
const KEYWORDS: &[&str] = &[
    "VERSION",
    "NS_",
    "NS_DESC_",
    "CM_",
    "BA_DEF_",
    "BA_",
    "VAL_",
    "CAT_DEF_",
    "CAT_",
    "FILTER",
    "BA_DEF_DEF_",
    "EV_DATA_",
    "ENVVAR_DATA_",
    "SGTYPE_",
    "SGTYPE_VAL_",
    "BA_DEF_SGTYPE_",
    "BA_SGTYPE_",
    "SIG_TYPE_REF_",
    "VAL_TABLE_",
    "SIG_GROUP_",
    "SIG_VALTYPE_",
    "SIGTYPE_VALTYPE_",
    "BO_TX_BU_",
    "BA_DEF_REL_",
    "BA_REL_",
    "BA_DEF_DEF_REL_",
    "BU_SG_REL_",
    "BU_EV_REL_",
    "BU_BO_REL_",
    "SG_MUL_VAL_",
    "BS_",
    "BU_",
    "BO_",
    "SG_",
    "EV_",
    "VECTOR__XXX",
];

/// Symbols a `NS_` block may list. The list consumes identifiers only
/// while they come from this set; the first outsider is left for the
/// main dispatch loop.
pub(crate) const NEW_SYMBOLS: &[&str] = &[
    "CM_",
    "NS_DESC_",
    "BA_DEF_",
    "BA_",
    "VAL_",
    "CAT_DEF_",
    "CAT_",
    "FILTER",
    "BA_DEF_DEF_",
    "EV_DATA_",
    "ENVVAR_DATA_",
    "SGTYPE_",
    "SGTYPE_VAL_",
    "BA_DEF_SGTYPE_",
    "BA_SGTYPE_",
    "SIG_TYPE_REF_",
    "VAL_TABLE_",
    "SIG_GROUP_",
    "SIG_VALTYPE_",
    "SIGTYPE_VALTYPE_",
    "BO_TX_BU_",
    "BA_DEF_REL_",
    "BA_REL_",
    "BA_DEF_DEF_REL_",
    "BU_SG_REL_",
    "BU_EV_REL_",
    "BU_BO_REL_",
    "SG_MUL_VAL_",
];

/// Is the identifier one of the reserved words?
pub(crate) fn is_keyword(identifier: &str) -> bool {
    KEYWORDS.contains(&identifier)
}

/// Skip whitespace and `//` line comments. A lone `/` is not consumed.
pub(crate) fn skip_whitespace(source: &mut Source) {
    while !source.is_eof() {
        let c = source.current_char();
        if c.is_ascii_whitespace() {
            source.advance();
            continue;
        }
        if c == '/' {
            let mark = source.mark();
            source.advance();
            if source.current_char() == '/' {
                while !source.is_eof() && source.current_char() != '\n' {
                    source.advance();
                }
                continue;
            }
            source.reset(mark);
        }
        break;
    }
}

/// Read an identifier; empty when the next character starts none.
///
/// The first character must be an ASCII letter, subsequent ones may be
/// alphanumeric. `_`, `-`, `<` and `>` are allowed anywhere (the latter
/// three are an undocumented extension seen in exported files).
pub(crate) fn identifier(source: &mut Source) -> String {
    skip_whitespace(source);
    let mut result = String::new();
    while !source.is_eof() {
        let c = source.current_char();
        let extra = c == '_' || c == '-' || c == '<' || c == '>';
        let valid = if result.is_empty() {
            extra || c.is_ascii_alphabetic()
        } else {
            extra || c.is_ascii_alphanumeric()
        };
        if !valid {
            break;
        }
        result.push(c);
        source.advance();
    }
    result
}

/// Consume `expected` if it is the next non-whitespace character.
pub(crate) fn expect_char(source: &mut Source, expected: char) -> bool {
    skip_whitespace(source);
    if source.is_eof() || source.current_char() != expected {
        return false;
    }
    source.advance();
    true
}

/// Read a double-quoted string literal. A backslash escapes exactly the
/// next character. `None` when no literal starts here or the literal is
/// unterminated.
pub(crate) fn string(source: &mut Source) -> Option<String> {
    skip_whitespace(source);
    if source.is_eof() || source.current_char() != '"' {
        return None;
    }
    source.advance();

    let mut result = String::new();
    loop {
        if source.is_eof() {
            return None;
        }
        let c = source.current_char();
        source.advance();
        match c {
            '"' => return Some(result),
            '\\' => {
                if source.is_eof() {
                    return None;
                }
                result.push(source.current_char());
                source.advance();
            }
            _ => result.push(c),
        }
    }
}

/// Read an unsigned decimal integer (digits only).
pub(crate) fn uint(source: &mut Source) -> Option<u32> {
    skip_whitespace(source);
    let digits: String = source
        .rest()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    let value = digits.parse().ok()?;
    source.set_pos(source.pos() + digits.len());
    Some(value)
}

/// Read a signed decimal integer (optional sign, digits).
pub(crate) fn int(source: &mut Source) -> Option<i32> {
    skip_whitespace(source);
    let rest = source.rest();
    let mut len = 0;
    let mut chars = rest.chars();
    let mut c = chars.next();
    if matches!(c, Some('+') | Some('-')) {
        len += 1;
        c = chars.next();
    }
    while let Some(d) = c {
        if !d.is_ascii_digit() {
            break;
        }
        len += 1;
        c = chars.next();
    }
    let value = rest[..len].parse().ok()?;
    source.set_pos(source.pos() + len);
    Some(value)
}

/// Read a floating point number: the longest prefix of the form
/// `[+-]digits[.digits][eE[+-]digits]` with at least one mantissa
/// digit. The exponent is consumed only when complete.
pub(crate) fn double(source: &mut Source) -> Option<f64> {
    skip_whitespace(source);
    let bytes = source.rest().as_bytes();
    let mut len = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        len += 1;
    }
    let mut mantissa_digits = 0;
    while bytes.get(len).is_some_and(|b| b.is_ascii_digit()) {
        len += 1;
        mantissa_digits += 1;
    }
    if bytes.get(len) == Some(&b'.') {
        len += 1;
        while bytes.get(len).is_some_and(|b| b.is_ascii_digit()) {
            len += 1;
            mantissa_digits += 1;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }
    if matches!(bytes.get(len), Some(b'e') | Some(b'E')) {
        let mut exp_len = len + 1;
        if matches!(bytes.get(exp_len), Some(b'+') | Some(b'-')) {
            exp_len += 1;
        }
        let exp_start = exp_len;
        while bytes.get(exp_len).is_some_and(|b| b.is_ascii_digit()) {
            exp_len += 1;
        }
        if exp_len > exp_start {
            len = exp_len;
        }
    }

    let value = source.rest()[..len].parse().ok()?;
    source.set_pos(source.pos() + len);
    Some(value)
}
