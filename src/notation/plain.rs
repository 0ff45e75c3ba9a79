/*!
 * Notation to plain text conversion for providers without prosody control.
 *
 * Pauses become ellipses, every other marker is reduced to its inner text.
 * Style directives and capitalised words pass through unchanged.
 */

use super::patterns::{
    BEAT, FAST, LONE_BEAT, LONG_PAUSE, PITCH_DOWN, PITCH_UP, SHORT_PAUSE, SLOW, SOFT, STRONG, TAG,
    WHISPER, WHITESPACE_RUN,
};

/// Replacement for `•`
pub const SHORT_ELLIPSIS: &str = " ... ";

/// Replacement for `• • •`
pub const LONG_ELLIPSIS: &str = " ... ... ";

/// Replacement for `//`
pub const BEAT_ELLIPSIS: &str = " ... ... ... ";

/// Convert a notation line into plain text
pub fn to_plain(text: &str) -> String {
    let mut result = TAG.replace(text, "");

    result = result.replace(LONG_PAUSE, LONG_ELLIPSIS);
    result = result.replace(SHORT_PAUSE, SHORT_ELLIPSIS);
    result = BEAT.replace(&result, BEAT_ELLIPSIS);
    result = LONE_BEAT.replace(&result, BEAT_ELLIPSIS);

    for marker in [&STRONG, &SOFT, &SLOW, &FAST, &PITCH_UP, &PITCH_DOWN, &WHISPER] {
        result = marker.replace(&result, "${1}");
    }

    WHITESPACE_RUN.replace_all(&result, " ").trim().to_string()
}
