//! Wildcard grammar for tag filtering.
//!
//! Patterns follow `fnmatch` without path semantics:
//!
//! - `*` matches any run of characters, including `.` and `/`;
//! - `?` matches exactly one character;
//! - `[abc]`, `[a-z]` and `[!abc]` match one character from (or outside) a set;
//! - `\x` matches `x` literally, so `\*` is a plain star; a trailing `\` is a
//!   plain backslash;
//! - a `[` with no closing `]` is a plain `[`, and the rest of the pattern
//!   keeps its wildcards;
//! - comparison is case-sensitive.
//!
//! The empty pattern is handled by callers as "match all".

use glob::{MatchOptions, Pattern};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

#[derive(Clone, Debug)]
/// A wildcard pattern compiled once and reused across every candidate.
pub struct WildcardPattern {
    raw: String,
    compiled: Pattern,
}

impl WildcardPattern {
    pub fn new(raw: &str) -> Self {
        let translated = translate(raw);
        let compiled = match Pattern::new(&translated) {
            Ok(pattern) => pattern,
            Err(err) => {
                // translate() only emits closed classes and single stars.
                tracing::warn!(pattern = raw, error = %err, "wildcard pattern failed to compile");
                Pattern::new(&Pattern::escape(raw)).unwrap_or_default()
            }
        };
        Self {
            raw: raw.to_string(),
            compiled,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// True for the empty pattern, which selects everything.
    pub fn matches_everything(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn matches(&self, candidate: &str) -> bool {
        self.compiled.matches_with(candidate, MATCH_OPTIONS)
    }
}

// Rewrite fnmatch syntax into glob syntax: escapes become one-character
// classes, unclosed `[` becomes `[[]`, and star runs collapse (glob reserves
// `**` for recursive directory matching).
fn translate(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().collect();
    let mut out = String::with_capacity(raw.len() + 4);
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '\\' => match chars.get(i + 1) {
                Some(&next) => {
                    push_literal(&mut out, next);
                    i += 2;
                }
                None => {
                    out.push('\\');
                    i += 1;
                }
            },
            '[' => match class_end(&chars, i) {
                Some(end) => {
                    out.extend(&chars[i..=end]);
                    i = end + 1;
                }
                None => {
                    out.push_str("[[]");
                    i += 1;
                }
            },
            '*' => {
                if !out.ends_with('*') || out.ends_with("[*]") {
                    out.push('*');
                }
                i += 1;
            }
            other => {
                out.push(other);
                i += 1;
            }
        }
    }
    out
}

// Index of the `]` closing the class opened at `start`. The first member may
// itself be `]`, as in `[]a]` or `[!]a]`.
fn class_end(chars: &[char], start: usize) -> Option<usize> {
    let mut first = start + 1;
    if chars.get(first) == Some(&'!') {
        first += 1;
    }
    if first >= chars.len() {
        return None;
    }
    chars[first + 1..]
        .iter()
        .position(|&c| c == ']')
        .map(|offset| first + 1 + offset)
}

fn push_literal(out: &mut String, ch: char) {
    match ch {
        '*' | '?' | '[' | ']' => {
            out.push('[');
            out.push(ch);
            out.push(']');
        }
        other => out.push(other),
    }
}
