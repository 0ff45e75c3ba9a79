/*!
 * Marker patterns shared by the SSML and plain-text rewriters.
 *
 * Each marker is a regex plus an optional context guard. The guards express
 * the look-behind / look-ahead conditions of the notation (the `regex` crate
 * has no look-around). A candidate rejected by its guard is not consumed:
 * scanning resumes one character after the candidate's start, so a later
 * match that overlaps the rejected one can still be found.
 */

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Context condition evaluated around each candidate match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Guard {
    /// Every match is accepted
    Always,
    /// Preceded and followed by whitespace or a string boundary
    WhitespaceBounded,
    /// No ASCII letter directly before the match or directly after it
    NotBetweenLetters,
    /// Not preceded by `<` or `/`, and not followed by an unclosed tag
    OutsideTag,
    /// Not wrapped in a second pair of angle brackets, as in `<<slow>>`
    NotDoubledAngle,
}

impl Guard {
    fn accepts(self, text: &str, start: usize, end: usize) -> bool {
        let before = text[..start].chars().next_back();
        let after = text[end..].chars().next();

        match self {
            Guard::Always => true,
            Guard::WhitespaceBounded => {
                before.is_none_or(char::is_whitespace) && after.is_none_or(char::is_whitespace)
            }
            Guard::NotBetweenLetters => {
                !before.is_some_and(|c| c.is_ascii_alphabetic())
                    && !after.is_some_and(|c| c.is_ascii_alphabetic())
            }
            Guard::OutsideTag => {
                if matches!(before, Some('<') | Some('/')) {
                    return false;
                }
                // Inside a tag when the next angle bracket closes one
                text[end..].chars().find(|c| *c == '<' || *c == '>') != Some('>')
            }
            Guard::NotDoubledAngle => !(before == Some('<') && after == Some('>')),
        }
    }
}

/// A notation marker: pattern plus context guard
#[derive(Debug)]
pub(crate) struct Marker {
    pattern: Regex,
    guard: Guard,
}

impl Marker {
    fn new(pattern: &str, guard: Guard) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("Invalid notation marker regex"),
            guard,
        }
    }

    /// Replace every accepted match, expanding `$1`-style groups in `template`
    pub(crate) fn replace(&self, text: &str, template: &str) -> String {
        self.replace_with(text, |caps| {
            let mut expanded = String::new();
            caps.expand(template, &mut expanded);
            expanded
        })
    }

    /// Replace every accepted match with the output of `render`
    pub(crate) fn replace_with<F>(&self, text: &str, mut render: F) -> String
    where
        F: FnMut(&Captures<'_>) -> String,
    {
        let mut result = String::with_capacity(text.len());
        let mut copied_up_to = 0;
        let mut search_from = 0;

        while search_from <= text.len() {
            let Some(caps) = self.pattern.captures_at(text, search_from) else {
                break;
            };
            let Some(whole) = caps.get(0) else {
                break;
            };

            if self.guard.accepts(text, whole.start(), whole.end()) {
                result.push_str(&text[copied_up_to..whole.start()]);
                result.push_str(&render(&caps));
                copied_up_to = whole.end();
                search_from = if whole.is_empty() {
                    next_char_boundary(text, whole.end())
                } else {
                    whole.end()
                };
            } else {
                search_from = next_char_boundary(text, whole.start());
            }
        }

        result.push_str(&text[copied_up_to..]);
        result
    }
}

fn next_char_boundary(text: &str, index: usize) -> usize {
    index + text[index..].chars().next().map_or(1, char::len_utf8)
}

/// Long pause: bullet, space, bullet, space, bullet
pub(crate) const LONG_PAUSE: &str = "• • •";

/// Short pause: a single bullet
pub(crate) const SHORT_PAUSE: char = '•';

// Legacy inline tags
pub(crate) static LEGACY_BOLD: Lazy<Marker> =
    Lazy::new(|| Marker::new(r"<b>([^<]+)</b>", Guard::Always));
pub(crate) static LEGACY_EM: Lazy<Marker> =
    Lazy::new(|| Marker::new(r"<em>([^<]+)</em>", Guard::Always));

// Speaking styles; the intensity form must be tried first
pub(crate) static STYLE_WITH_DEGREE: Lazy<Marker> =
    Lazy::new(|| Marker::new(r"\{(\w+),(\d+\.?\d*):\s*([^}]+)\}", Guard::Always));
pub(crate) static STYLE: Lazy<Marker> =
    Lazy::new(|| Marker::new(r"\{(\w+):\s*([^}]+)\}", Guard::Always));

// Beat (three second silence)
pub(crate) static LONE_BEAT: Lazy<Marker> = Lazy::new(|| Marker::new(r"^//$", Guard::Always));
pub(crate) static BEAT: Lazy<Marker> = Lazy::new(|| Marker::new(r"//", Guard::WhitespaceBounded));

// Paired delimiters
pub(crate) static STRONG: Lazy<Marker> =
    Lazy::new(|| Marker::new(r"\*\*([^*]+)\*\*", Guard::Always));
pub(crate) static SOFT: Lazy<Marker> =
    Lazy::new(|| Marker::new(r"_([^_]+)_", Guard::NotBetweenLetters));
pub(crate) static SLOW: Lazy<Marker> = Lazy::new(|| Marker::new(r"<<([^<>]+)>>", Guard::Always));
pub(crate) static FAST: Lazy<Marker> = Lazy::new(|| Marker::new(r">>([^<>]+)<<", Guard::Always));
pub(crate) static PITCH_UP: Lazy<Marker> =
    Lazy::new(|| Marker::new(r"\^([^^]+)\^", Guard::Always));
pub(crate) static PITCH_DOWN: Lazy<Marker> =
    Lazy::new(|| Marker::new(r",([^,\s][^,]*[^,\s]),", Guard::Always));
pub(crate) static WHISPER: Lazy<Marker> = Lazy::new(|| Marker::new(r"~([^~]+)~", Guard::Always));

// Loudness: whole words of two or more capitals
pub(crate) static SHOUT: Lazy<Marker> =
    Lazy::new(|| Marker::new(r"\b([A-Z]{2,})\b", Guard::OutsideTag));

// Opening or closing tags; `<<word>>` is the slow marker, not a tag
pub(crate) static TAG: Lazy<Marker> =
    Lazy::new(|| Marker::new(r"</?[A-Za-z][^<>]*>", Guard::NotDoubledAngle));

pub(crate) static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));
