//! Wildcard pattern translation and text normalization.
//!
//! Rule patterns use `*` (any run of characters), `?` (exactly one character)
//! and `\` as an escape introducer, while `[`, `]`, `{` and `}` are ordinary
//! literal characters (path brackets, GUID braces). The glob engine the
//! patterns are compiled for treats `[`/`]` as character-class delimiters and
//! `{`/`}` as alternation-group delimiters, so [`translate`] rewrites every
//! rule pattern into the engine's escaped form before compilation.

use globset::{GlobBuilder, GlobMatcher};

/// Translate a rule pattern into its glob-engine form.
///
/// Backslash runs are handled as a whole, scanning left to right:
///
/// - an even run represents pre-escaped literal backslashes and is emitted
///   unchanged;
/// - an odd run followed by `*` or `?` keeps its final backslash as the
///   escape for that wildcard, which is emitted escaped;
/// - an odd run followed by anything else (or end of input) represents that
///   many literal backslashes, so the final one is doubled.
///
/// Unescaped `*` and `?` pass through as live wildcards. `[`, `]`, `{` and
/// `}` are always emitted escaped. Every input string is a valid pattern;
/// translation cannot fail.
#[must_use]
pub fn translate(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '\\' => {
                let mut run = 1;
                while i + run < chars.len() && chars[i + run] == '\\' {
                    run += 1;
                }
                let next = chars.get(i + run).copied();
                if run % 2 == 0 {
                    // Already in two-backslashes-per-literal form.
                    for _ in 0..run {
                        out.push('\\');
                    }
                    i += run;
                } else if let Some(wildcard @ ('*' | '?')) = next {
                    // Final backslash escapes the wildcard.
                    for _ in 0..run {
                        out.push('\\');
                    }
                    out.push(wildcard);
                    i += run + 1;
                } else {
                    // The whole run is literal backslashes; double the last.
                    for _ in 0..run + 1 {
                        out.push('\\');
                    }
                    i += run;
                }
            }
            c @ ('[' | ']' | '{' | '}') => {
                out.push('\\');
                out.push(c);
                i += 1;
            }
            c => {
                out.push(c);
                i += 1;
            }
        }
    }

    out
}

/// Compile an already-translated pattern into a glob matcher.
///
/// `backslash_escape` is forced on so that translated `\\` pairs match one
/// literal backslash on every platform, and `literal_separator` is off so a
/// live `*` spans path separators.
pub(crate) fn build_glob(translated: &str) -> Result<GlobMatcher, globset::Error> {
    Ok(GlobBuilder::new(translated)
        .backslash_escape(true)
        .literal_separator(false)
        .build()?
        .compile_matcher())
}

/// Collapse every maximal run of space/tab characters to a single space.
///
/// Applied to both sides of contains/startswith/endswith and whole-value
/// placeholder comparisons when collapsing is enabled.
#[must_use]
pub(crate) fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_run = false;
    for c in s.chars() {
        if c == ' ' || c == '\t' {
            if !in_run {
                out.push(' ');
            }
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}
