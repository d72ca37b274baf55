//! Text heuristics and cleanup for extracted PDF text.
//!
//! [`is_garbled`] decides whether an OCR page is worth a second recognition
//! pass. [`post_process`] cleans the final text; it is deterministic and
//! idempotent, so running it twice gives the same output as running it once.

use regex::Regex;
use std::sync::OnceLock;

/// Below this many non-whitespace-trimmed characters text is always garbled
const MIN_MEANINGFUL_LENGTH: usize = 10;

/// Minimum share of alphanumeric, whitespace and basic punctuation characters
const MIN_MEANINGFUL_RATIO: f64 = 0.7;

/// Maximum share of space characters
const MAX_SPACE_RATIO: f64 = 0.3;

/// Maximum share of uppercase letters
const MAX_UPPERCASE_RATIO: f64 = 0.5;

/// A single uppercase letter repeated this many times in a row is an artifact
const REPEATED_UPPERCASE_RUN: usize = 5;

const BASIC_PUNCTUATION: &str = ".,;:!?()-";

/// Heuristically decide whether recognised text looks corrupted.
///
/// This is a tunable heuristic, not a correctness check: legitimate text such
/// as tables of capitalised codes can be flagged too.
pub fn is_garbled(text: &str) -> bool {
    if text.trim().chars().count() < MIN_MEANINGFUL_LENGTH {
        return true;
    }

    let total = text.chars().count() as f64;

    let meaningful = text
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || BASIC_PUNCTUATION.contains(*c))
        .count() as f64;
    if meaningful / total < MIN_MEANINGFUL_RATIO {
        return true;
    }

    let spaces = text.chars().filter(|&c| c == ' ').count() as f64;
    if text.contains("   ") || spaces > total * MAX_SPACE_RATIO {
        return true;
    }

    let uppercase = text.chars().filter(|c| c.is_uppercase()).count() as f64;
    if uppercase > total * MAX_UPPERCASE_RATIO {
        return true;
    }

    has_repeated_uppercase(text, REPEATED_UPPERCASE_RUN)
}

/// True if any ASCII uppercase letter appears `run` or more times consecutively
fn has_repeated_uppercase(text: &str, run: usize) -> bool {
    let mut previous = None;
    let mut count = 0;

    for ch in text.chars() {
        if ch.is_ascii_uppercase() && Some(ch) == previous {
            count += 1;
        } else {
            count = 1;
        }
        if ch.is_ascii_uppercase() && count >= run {
            return true;
        }
        previous = Some(ch);
    }

    false
}

/// Options for [`post_process_with`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostProcessOptions {
    /// Apply the whole-word `rn -> m`, `vv -> w` recognition fixes
    pub fix_digraphs: bool,
}

/// Whole-word recognition artifacts and their replacements
const DIGRAPH_FIXES: [(&str, &str); 2] = [("rn", "m"), ("vv", "w")];

fn line_endings() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\r\n?").expect("valid regex"))
}

fn repeated_spaces() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[ \t]{2,}").expect("valid regex"))
}

fn spaces_around_newline() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[ \t]*\n[ \t]*").expect("valid regex"))
}

fn excess_newlines() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n{3,}").expect("valid regex"))
}

fn digraph_patterns() -> &'static [(Regex, &'static str)] {
    static RE: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    RE.get_or_init(|| {
        DIGRAPH_FIXES
            .iter()
            .map(|(wrong, right)| {
                let pattern = format!(r"\b{}\b", regex::escape(wrong));
                (Regex::new(&pattern).expect("valid regex"), *right)
            })
            .collect()
    })
}

/// Clean extracted text with the default options (digraph fixes off)
pub fn post_process(text: &str) -> String {
    post_process_with(text, PostProcessOptions::default())
}

/// Clean extracted text.
///
/// Collapses repeated spaces, strips spaces around line breaks, rejoins words
/// broken across a single line break, joins comma-split sentences with a
/// space, limits blank lines to one, optionally fixes digraph artifacts, and
/// trims. Empty input is returned unchanged.
pub fn post_process_with(text: &str, options: PostProcessOptions) -> String {
    if text.is_empty() {
        return String::new();
    }

    let cleaned = line_endings().replace_all(text, "\n");
    let cleaned = repeated_spaces().replace_all(&cleaned, " ");
    let cleaned = spaces_around_newline().replace_all(&cleaned, "\n");
    let cleaned = join_broken_lines(&cleaned);
    let mut cleaned = excess_newlines().replace_all(&cleaned, "\n\n").into_owned();

    if options.fix_digraphs {
        for (pattern, replacement) in digraph_patterns() {
            cleaned = pattern.replace_all(&cleaned, *replacement).into_owned();
        }
    }

    cleaned.trim().to_string()
}

/// Rejoin words and sentences split by a single line break.
///
/// Decisions look at the neighbours in the input, so a chain such as
/// `a\nb\nc` is fully joined in one pass.
fn join_broken_lines(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let lower = |idx: Option<usize>| idx.and_then(|i| chars.get(i)).is_some_and(|c| c.is_ascii_lowercase());

    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        let ch = chars[i];
        let prev = i.checked_sub(1);

        if ch == '-' && lower(prev) && chars.get(i + 1) == Some(&'\n') && lower(Some(i + 2)) {
            // hyphenated word broken across lines
            i += 2;
            continue;
        }

        if ch == '\n' {
            let next = Some(i + 1);
            if lower(prev) && lower(next) {
                i += 1;
                continue;
            }
            if prev.map(|p| chars[p]) == Some(',') && lower(next) {
                out.push(' ');
                i += 1;
                continue;
            }
        }

        out.push(ch);
        i += 1;
    }

    out
}

/// Join per-page texts with a blank line, skipping pages without text
pub fn join_pages<I, S>(pages: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    pages
        .into_iter()
        .filter(|page| !page.as_ref().trim().is_empty())
        .map(|page| page.as_ref().trim_end().to_string())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Length of `text` in characters after trimming surrounding whitespace
pub fn trimmed_len(text: &str) -> usize {
    text.trim().chars().count()
}
