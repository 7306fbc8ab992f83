//! Composition root for the conversational client.

use std::env;

pub mod store;

/// Endpoints and narration voice, from the environment with local
/// defaults. A `.env` file is honored when present.
#[derive(Clone, Debug)]
pub struct Config {
    pub completion_url: String,
    pub synthesis_url: String,
    pub transcription_url: String,
    pub transcription_key: Option<String>,
    pub voice: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            completion_url: env::var("COMPLETION_URL")
                .unwrap_or_else(|_| "http://localhost:8000/api/chat-stream".into()),
            synthesis_url: env::var("SYNTHESIS_URL")
                .unwrap_or_else(|_| "http://localhost:5002/synthesize".into()),
            transcription_url: env::var("TRANSCRIPTION_URL")
                .unwrap_or_else(|_| "http://localhost:9000/transcriptions".into()),
            transcription_key: env::var("TRANSCRIPTION_KEY").ok(),
            voice: env::var("VOICE").unwrap_or_else(|_| "fr-FR-DeniseNeural".into()),
        }
    }
}

/// Title a conversation after its first user message.
pub fn conversation_title(first_message: &str) -> String {
    let title: String = first_message.chars().take(40).collect();
    if title.is_empty() {
        "Nouvelle conversation".into()
    } else {
        title
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voice_comes_from_env_or_default() {
        env::remove_var("VOICE");
        assert_eq!(Config::from_env().voice, "fr-FR-DeniseNeural");
        env::set_var("VOICE", "fr-FR-HenriNeural");
        assert_eq!(Config::from_env().voice, "fr-FR-HenriNeural");
        env::remove_var("VOICE");
    }

    #[test]
    fn titles_are_clipped_to_forty_chars() {
        let long = "x".repeat(80);
        assert_eq!(conversation_title(&long).chars().count(), 40);
        assert_eq!(conversation_title(""), "Nouvelle conversation");
        assert_eq!(conversation_title("Salut"), "Salut");
    }
}
