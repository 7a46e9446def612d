//! Shared codec between token text and argument values.
//!
//! The lexer hands the parser raw token text; [`decode`] turns it into the
//! value stored in the tree. The builder goes the other way with [`encode`],
//! producing the shortest text that decodes back to the same value, so that
//! `build(parse(build(x)))` reproduces `build(x)` byte for byte.

/// Whitespace that separates tokens.
pub fn is_separator(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c')
}

/// Characters that end an unquoted token (besides whitespace).
pub fn is_delimiter(c: char) -> bool {
    matches!(c, '{' | '}' | ';' | '#')
}

pub fn is_quote(c: char) -> bool {
    matches!(c, '"' | '\'')
}

/// Whether `value` has to be quoted to survive a trip through the lexer.
pub fn needs_quoting(value: &str) -> bool {
    value.is_empty()
        || value.ends_with('\\')
        || value
            .chars()
            .any(|c| is_separator(c) || is_delimiter(c) || is_quote(c))
}

/// Resolves a token's text into its value.
///
/// Quoted text loses its outer quote marks and has `\\` and `\<quote>`
/// resolved. Any other backslash sequence is kept as written.
pub fn decode(text: &str, quoted: bool) -> String {
    if !quoted {
        return text.to_string();
    }
    let mut chars = text.chars();
    let Some(quote) = chars.next() else {
        return String::new();
    };
    let inner = chars.as_str();
    let inner = inner.strip_suffix(quote).unwrap_or(inner);

    let mut value = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            value.push(c);
            continue;
        }
        match chars.next() {
            Some(escaped) if escaped == '\\' || escaped == quote => value.push(escaped),
            Some(other) => {
                value.push('\\');
                value.push(other);
            }
            None => value.push('\\'),
        }
    }
    value
}

/// Renders `value` as token text, quoting only when required.
///
/// Single quotes are preferred; double quotes are used when the value holds a
/// single quote but no double quote. Inside the chosen quotes, backslashes and
/// that quote character are escaped.
pub fn encode(value: &str) -> String {
    if !needs_quoting(value) {
        return value.to_string();
    }
    let quote = if value.contains('\'') && !value.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut text = String::with_capacity(value.len() + 2);
    text.push(quote);
    for c in value.chars() {
        if c == '\\' || c == quote {
            text.push('\\');
        }
        text.push(c);
    }
    text.push(quote);
    text
}
