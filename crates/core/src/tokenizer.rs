//! Tokenizer: normalized text → classified tokens.
//!
//! A single left-to-right scan splits the text into maximal runs of
//! digits, letters (plus one trailing period), and symbols. A digit run
//! absorbs a directly following registered ordinal suffix (`21st`, or
//! `21:a` when a locale registers `:a`). Each run is then
//! classified against the locale.

use tracing::trace;

use crate::locale::{Lexeme, Locale};
use crate::normalize::NormalizedInput;
use crate::types::{Issue, Issues, Token, TokenKind};

/// Tokens in source order plus tokenizer issues.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenStream {
    pub tokens: Vec<Token>,
    pub issues: Issues,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunKind {
    Digits,
    Letters,
    Symbols,
}

impl RunKind {
    fn of(c: char) -> Self {
        if c.is_ascii_digit() {
            Self::Digits
        } else if c.is_alphabetic() {
            Self::Letters
        } else {
            Self::Symbols
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Run {
    start: usize,
    end: usize,
    kind: RunKind,
}

/// Tokenize normalized input.
///
/// Empty input produces no tokens and the `input-empty` issue.
#[must_use]
pub fn tokenize(input: &NormalizedInput, locale: &Locale) -> TokenStream {
    if input.is_empty() {
        trace!("tokenizer: empty input");
        return TokenStream {
            tokens: Vec::new(),
            issues: Issues::new().with(Issue::InputEmpty),
        };
    }

    let text = input.normalized.as_str();
    let tokens: Vec<Token> = scan(text, locale)
        .into_iter()
        .enumerate()
        .map(|(index, run)| classify(text, run, index, locale))
        .collect();

    trace!(tokens = tokens.len(), "tokenizer: done");
    TokenStream {
        tokens,
        issues: Issues::new(),
    }
}

fn scan(text: &str, locale: &Locale) -> Vec<Run> {
    let mut runs = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some(&(start, first)) = chars.peek() {
        if first.is_whitespace() {
            chars.next();
            continue;
        }

        let kind = RunKind::of(first);
        let mut end = start;
        while let Some(&(i, c)) = chars.peek() {
            if c.is_whitespace() || RunKind::of(c) != kind {
                break;
            }
            end = i + c.len_utf8();
            chars.next();
        }

        match kind {
            RunKind::Letters => {
                if let Some(&(i, '.')) = chars.peek() {
                    end = i + 1;
                    chars.next();
                }
            }
            RunKind::Digits => {
                if let Some(len) = locale.ordinal_suffix_len(&text[end..]) {
                    end += len;
                    while chars.next_if(|&(i, _)| i < end).is_some() {}
                }
            }
            RunKind::Symbols => {}
        }

        runs.push(Run { start, end, kind });
    }

    runs
}

fn classify(text: &str, run: Run, index: usize, locale: &Locale) -> Token {
    let raw = &text[run.start..run.end];
    let lower = raw.to_lowercase();
    let token = |kind: TokenKind, lower: &str, normalized: &str| Token {
        raw: raw.to_string(),
        normalized: normalized.to_string(),
        lower: lower.to_string(),
        kind,
        subtype: None,
        value: None,
        index,
        start: run.start,
        end: run.end,
    };

    if run.kind == RunKind::Digits && raw.bytes().all(|b| b.is_ascii_digit()) {
        return match raw.parse::<i64>() {
            Ok(value) => Token {
                value: Some(value),
                ..token(TokenKind::Number, &lower, raw)
            },
            Err(_) => token(TokenKind::Word, &lower, raw),
        };
    }

    let canonical = locale.canonical(&lower);
    if let Some(lexeme) = locale.lookup(canonical) {
        return with_lexeme(token(TokenKind::Word, canonical, canonical), lexeme);
    }

    if let Some(value) = locale.parse_ordinal(canonical) {
        return Token {
            subtype: Some("ordinal".to_string()),
            value: Some(value),
            ..token(TokenKind::Number, canonical, &value.to_string())
        };
    }

    if run.kind == RunKind::Symbols {
        return token(TokenKind::Symbol, &lower, raw);
    }

    let stripped = canonical.strip_suffix('.').unwrap_or(canonical);
    let retry = locale.canonical(stripped);
    if let Some(lexeme) = locale.lookup(retry) {
        return with_lexeme(token(TokenKind::Word, canonical, retry), lexeme);
    }

    token(TokenKind::Word, canonical, stripped)
}

fn with_lexeme(token: Token, lexeme: Lexeme<'_>) -> Token {
    match lexeme {
        Lexeme::Month(month) => Token {
            kind: TokenKind::Month,
            value: Some(i64::from(month)),
            ..token
        },
        Lexeme::Qualifier(name) => Token {
            kind: TokenKind::Qualifier,
            subtype: Some(name.to_string()),
            ..token
        },
        Lexeme::RangeMarker(role) => Token {
            kind: TokenKind::RangeMarker,
            subtype: Some(role.as_str().to_string()),
            ..token
        },
        Lexeme::Noise => Token {
            kind: TokenKind::Noise,
            ..token
        },
    }
}
