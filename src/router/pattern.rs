//! Route pattern tokenizer.
//!
//! Splits `/users/:id/files/*path` into static text and parameter tokens and
//! enforces the syntax rules before anything touches the trie.

use std::borrow::Cow;

use crate::error::RouteError;

/// Name bound by an unnamed catch-all (`/static/*`).
pub const CATCH_ALL_DEFAULT_NAME: &str = "*";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token<'a> {
    /// Literal text; always ends right before a parameter or at the end of the pattern.
    Static(Cow<'a, str>),
    /// `:name`, one path segment.
    Param(&'a str),
    /// `*` or `*name`, the rest of the path.
    CatchAll(&'a str),
}

#[derive(Debug)]
pub(crate) struct Pattern<'a> {
    pub tokens: Vec<Token<'a>>,
    pub param_names: Vec<&'a str>,
}

/// Tokenize `pattern`. Static text is lowercased when `case_sensitive` is off.
pub(crate) fn parse(pattern: &str, case_sensitive: bool) -> Result<Pattern<'_>, RouteError> {
    if !pattern.starts_with('/') {
        return Err(RouteError::MissingLeadingSlash(pattern.to_string()));
    }

    let bytes = pattern.as_bytes();
    let mut tokens = Vec::new();
    let mut param_names: Vec<&str> = Vec::new();
    let mut static_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let marker = bytes[i];
        if marker != b':' && marker != b'*' {
            i += 1;
            continue;
        }
        if bytes[i - 1] != b'/' {
            return Err(RouteError::PartialSegment {
                pattern: pattern.to_string(),
                position: i,
            });
        }

        let name_start = i + 1;
        let name_end = pattern[name_start..]
            .find('/')
            .map_or(bytes.len(), |offset| name_start + offset);
        let name = &pattern[name_start..name_end];

        if let Some(offset) = name.find([':', '*']) {
            return Err(RouteError::PartialSegment {
                pattern: pattern.to_string(),
                position: name_start + offset,
            });
        }

        tokens.push(static_token(&pattern[static_start..i], case_sensitive));

        let name = if marker == b':' {
            if name.is_empty() {
                return Err(RouteError::EmptyParamName(pattern.to_string()));
            }
            tokens.push(Token::Param(name));
            name
        } else {
            if name_end != bytes.len() {
                return Err(RouteError::CatchAllNotLast(pattern.to_string()));
            }
            let name = if name.is_empty() {
                CATCH_ALL_DEFAULT_NAME
            } else {
                name
            };
            tokens.push(Token::CatchAll(name));
            name
        };

        if param_names.contains(&name) {
            return Err(RouteError::DuplicateParamName {
                pattern: pattern.to_string(),
                name: name.to_string(),
            });
        }
        param_names.push(name);

        i = name_end;
        static_start = name_end;
    }

    if static_start < bytes.len() {
        tokens.push(static_token(&pattern[static_start..], case_sensitive));
    }

    Ok(Pattern {
        tokens,
        param_names,
    })
}

fn static_token(text: &str, case_sensitive: bool) -> Token<'_> {
    if case_sensitive || !text.bytes().any(|b| b.is_ascii_uppercase()) {
        Token::Static(Cow::Borrowed(text))
    } else {
        Token::Static(Cow::Owned(text.to_ascii_lowercase()))
    }
}
