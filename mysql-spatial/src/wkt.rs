//! Scanning helpers shared by the WKT parsers of every geometry type.
//!
//! WKT child lists are split on commas that sit at parenthesis depth zero, so
//! `(0 0,1 1),(2 2,3 3)` yields two rings no matter how deeply the members
//! themselves are nested.

use crate::result::{Error, Result};

/// Split `KEYWORD(...)` into the upper-cased keyword and the remainder.
pub(crate) fn split_keyword(text: &str) -> Result<(String, &str)> {
    let text = text.trim();
    let end = text
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(text.len());
    if end == 0 {
        return Err(Error::ParseError(format!(
            "expected a geometry keyword at the start of '{}'",
            text
        )));
    }
    Ok((text[..end].to_ascii_uppercase(), text[end..].trim()))
}

/// Check the keyword of `text` and return what sits inside its outer parentheses.
pub(crate) fn strip_keyword<'a>(text: &'a str, keyword: &str) -> Result<&'a str> {
    let (found, rest) = split_keyword(text)?;
    if found != keyword {
        return Err(Error::ParseError(format!(
            "expected {} but found {}",
            keyword, found
        )));
    }
    strip_parens(rest)
}

/// Return the contents of `(...)`, requiring the opening parenthesis to be
/// closed by the final character.
pub(crate) fn strip_parens(text: &str) -> Result<&str> {
    let text = text.trim();
    if !text.starts_with('(') {
        return Err(Error::ParseError(format!("expected '(' in '{}'", text)));
    }
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| unbalanced(text))?;
                if depth == 0 {
                    if i != text.len() - 1 {
                        return Err(Error::ParseError(format!(
                            "unexpected content after ')' in '{}'",
                            text
                        )));
                    }
                    return Ok(text[1..i].trim());
                }
            }
            _ => {}
        }
    }
    Err(unbalanced(text))
}

/// Split on commas at parenthesis depth zero. An empty input yields no items.
pub(crate) fn split_top_level(text: &str) -> Result<Vec<&str>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.checked_sub(1).ok_or_else(|| unbalanced(text))?,
            ',' if depth == 0 => {
                items.push(non_empty(&text[start..i], text)?);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(unbalanced(text));
    }
    items.push(non_empty(&text[start..], text)?);
    Ok(items)
}

/// Parse a bare `x y` coordinate pair.
pub(crate) fn parse_pair(text: &str) -> Result<(f64, f64)> {
    let mut parts = text.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(x), Some(y), None) => Ok((parse_number(x)?, parse_number(y)?)),
        _ => Err(Error::ParseError(format!(
            "expected an 'x y' coordinate pair, got '{}'",
            text.trim()
        ))),
    }
}

fn parse_number(text: &str) -> Result<f64> {
    text.parse::<f64>()
        .map_err(|_| Error::ParseError(format!("'{}' is not a number", text)))
}

fn non_empty<'a>(item: &'a str, whole: &str) -> Result<&'a str> {
    let item = item.trim();
    if item.is_empty() {
        return Err(Error::ParseError(format!("empty item in '{}'", whole)));
    }
    Ok(item)
}

fn unbalanced(text: &str) -> Error {
    Error::ParseError(format!("unbalanced parentheses in '{}'", text))
}
