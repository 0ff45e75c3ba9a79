/*!
 * Notation to SSML conversion.
 *
 * The rewrite is a fixed sequence of independent substitutions. Order is
 * significant: style directives with an intensity are tried before those
 * without, the beat before the bullets, and the triple bullet before the
 * single one. Output of earlier passes stays visible to later passes, which
 * is how markers inside style directives and legacy tags get expanded.
 */

use super::patterns::{
    BEAT, FAST, LEGACY_BOLD, LEGACY_EM, LONE_BEAT, LONG_PAUSE, PITCH_DOWN, PITCH_UP, SHORT_PAUSE,
    SHOUT, SLOW, SOFT, STRONG, STYLE, STYLE_WITH_DEGREE, WHISPER,
};

/// Voice used when the caller supplies none
pub const DEFAULT_VOICE: &str = "en-US-DavisNeural";

/// Silence for `//`
pub const BEAT_BREAK: &str = r#"<break time="3s"/>"#;

/// Silence for `• • •`
pub const LONG_BREAK: &str = r#"<break time="1500ms"/>"#;

/// Silence for `•`
pub const SHORT_BREAK: &str = r#"<break time="300ms"/>"#;

const STRONG_EMPHASIS: &str = r#"<emphasis level="strong">${1}</emphasis>"#;
const LEGACY_SOFT: &str = r#"<prosody volume="soft">${1}</prosody>"#;
const STYLE_WITH_DEGREE_EXPRESSION: &str =
    r#"<mstts:express-as style="${1}" styledegree="${2}">${3}</mstts:express-as>"#;
const STYLE_EXPRESSION: &str = r#"<mstts:express-as style="${1}">${2}</mstts:express-as>"#;
const SOFT_PROSODY: &str = r#"<prosody volume="soft" rate="95%">${1}</prosody>"#;
const SLOW_PROSODY: &str = r#"<prosody rate="slow">${1}</prosody>"#;
const FAST_PROSODY: &str = r#"<prosody rate="fast">${1}</prosody>"#;
const PITCH_UP_PROSODY: &str = r#"<prosody pitch="+10%">${1}</prosody>"#;
const PITCH_DOWN_PROSODY: &str = r#"<prosody pitch="-10%">${1}</prosody>"#;
const WHISPER_PROSODY: &str = r#"<prosody volume="x-soft" rate="90%">${1}</prosody>"#;

/// Convert a notation line into a complete SSML document for `voice`.
///
/// An empty or blank voice falls back to [`DEFAULT_VOICE`].
pub fn to_ssml(text: &str, voice: &str) -> String {
    let voice = if voice.trim().is_empty() {
        DEFAULT_VOICE
    } else {
        voice
    };

    wrap_document(&rewrite_body(text), voice)
}

/// Apply every marker rule to `text` without wrapping it in a document
pub fn rewrite_body(text: &str) -> String {
    // Only the ampersand is escaped; angle brackets are notation delimiters
    let mut result = text.replace('&', "&amp;");

    result = LEGACY_BOLD.replace(&result, STRONG_EMPHASIS);
    result = LEGACY_EM.replace(&result, LEGACY_SOFT);

    result = STYLE_WITH_DEGREE.replace(&result, STYLE_WITH_DEGREE_EXPRESSION);
    result = STYLE.replace(&result, STYLE_EXPRESSION);

    result = LONE_BEAT.replace(&result, BEAT_BREAK);
    result = BEAT.replace(&result, BEAT_BREAK);

    result = result.replace(LONG_PAUSE, LONG_BREAK);
    result = result.replace(SHORT_PAUSE, SHORT_BREAK);

    result = STRONG.replace(&result, STRONG_EMPHASIS);
    result = SOFT.replace(&result, SOFT_PROSODY);
    result = SLOW.replace(&result, SLOW_PROSODY);
    result = FAST.replace(&result, FAST_PROSODY);
    result = PITCH_UP.replace(&result, PITCH_UP_PROSODY);
    result = PITCH_DOWN.replace(&result, PITCH_DOWN_PROSODY);
    result = WHISPER.replace(&result, WHISPER_PROSODY);

    SHOUT.replace_with(&result, |caps| {
        format!(
            r#"<prosody volume="loud" rate="90%">{}</prosody>"#,
            title_case(&caps[1])
        )
    })
}

fn wrap_document(body: &str, voice: &str) -> String {
    format!(
        r#"<speak version="1.0" xmlns="http://www.w3.org/2001/10/synthesis" xmlns:mstts="https://www.w3.org/2001/mstts" xml:lang="en-US">
    <voice name="{}">
        {}
    </voice>
</speak>"#,
        escape_attribute(voice),
        body
    )
}

// "STOP" -> "Stop"
fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
