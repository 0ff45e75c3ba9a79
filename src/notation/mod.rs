/*!
 * Teleprompter notation rewriting.
 *
 * Notation reference:
 *
 * | Marker                | Meaning                         |
 * |-----------------------|---------------------------------|
 * | `•`                   | short pause (300ms)             |
 * | `• • •`               | long pause (1500ms)             |
 * | `//`                  | beat / silence (3s)             |
 * | `**word**`            | strong emphasis                 |
 * | `_word_`              | soft, understated               |
 * | `<<text>>`            | slow                            |
 * | `>>text<<`            | fast                            |
 * | `^word^`              | pitch up                        |
 * | `,word,`              | pitch down                      |
 * | `WORD`                | loud (all caps, 2+ letters)     |
 * | `~word~`              | whisper                         |
 * | `{style:text}`        | speaking style                  |
 * | `{style,degree:text}` | speaking style with intensity   |
 *
 * Two rewriters share the marker patterns:
 * - `ssml`: full SSML document with prosody, breaks and express-as styles
 * - `plain`: plain text with ellipsis pauses for providers without prosody
 *
 * Both are pure functions and accept any input.
 */

pub mod plain;
pub mod ssml;

mod patterns;

pub use self::plain::to_plain;
pub use self::ssml::{DEFAULT_VOICE, rewrite_body, to_ssml};

/// Which rewriter a provider consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotationFormat {
    /// SSML document
    Ssml,
    /// Plain text
    Plain,
}

impl NotationFormat {
    /// Rewrite a notation line into this format
    pub fn render(self, text: &str, voice: &str) -> String {
        match self {
            Self::Ssml => to_ssml(text, voice),
            Self::Plain => to_plain(text),
        }
    }
}
