use crate::app_config::SpeechService;

// @module: Recommended voices per speech service

/// A voice suggested for narration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoiceInfo {
    // @field: Name or alias accepted by the service
    pub name: &'static str,
    // @field: Short description
    pub description: &'static str,
}

const AZURE_VOICES: &[VoiceInfo] = &[
    VoiceInfo { name: "en-US-JennyNeural", description: "female, conversational" },
    VoiceInfo { name: "en-US-GuyNeural", description: "male, conversational" },
    VoiceInfo { name: "en-US-AriaNeural", description: "female, expressive" },
    VoiceInfo { name: "en-US-DavisNeural", description: "male, expressive" },
    VoiceInfo { name: "en-US-SaraNeural", description: "female, cheerful" },
];

const GOOGLE_VOICES: &[VoiceInfo] = &[
    VoiceInfo { name: "en-US-Neural2-F", description: "female" },
    VoiceInfo { name: "en-US-Neural2-D", description: "male" },
    VoiceInfo { name: "en-US-Studio-O", description: "female, studio quality" },
    VoiceInfo { name: "en-US-Studio-M", description: "male, studio quality" },
];

const ELEVENLABS_VOICES: &[VoiceInfo] = &[
    VoiceInfo { name: "Rachel", description: "female, calm" },
    VoiceInfo { name: "Adam", description: "male, deep" },
    VoiceInfo { name: "Antoni", description: "male, warm" },
    VoiceInfo { name: "Bella", description: "female, soft" },
    VoiceInfo { name: "Josh", description: "male, young" },
    VoiceInfo { name: "Elli", description: "female, young" },
];

// @returns: Recommended voices for a service
pub fn recommended_voices(service: SpeechService) -> &'static [VoiceInfo] {
    match service {
        SpeechService::Azure => AZURE_VOICES,
        SpeechService::Google => GOOGLE_VOICES,
        SpeechService::ElevenLabs => ELEVENLABS_VOICES,
    }
}

// @returns: Where the full voice list is published
pub fn full_list_url(service: SpeechService) -> &'static str {
    match service {
        SpeechService::Azure => {
            "https://learn.microsoft.com/en-us/azure/ai-services/speech-service/language-support"
        }
        SpeechService::Google => "https://cloud.google.com/text-to-speech/docs/voices",
        SpeechService::ElevenLabs => "https://elevenlabs.io/voice-library",
    }
}

/// Printable listing of the recommended voices for `service`
pub fn format_voice_list(service: SpeechService) -> String {
    let voices = recommended_voices(service);
    let width = voices.iter().map(|v| v.name.len()).max().unwrap_or(0);

    let mut output = format!("Recommended voices for {}:\n\n", service.to_lowercase_string());
    for voice in voices {
        let marker = if voice.name == service.default_voice() { " [default]" } else { "" };
        output.push_str(&format!(
            "  {:<width$}  ({}){}\n",
            voice.name,
            voice.description,
            marker,
            width = width
        ));
    }
    output.push_str(&format!("\n  Full list: {}\n", full_list_url(service)));
    output
}
