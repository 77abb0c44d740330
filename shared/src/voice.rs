//! Voice input for the onboarding form
//!
//! One recognition session at a time, single final transcript, no interim
//! results. The recognition engine sits behind [`SpeechRecognizer`] so the
//! session bookkeeping can run without a browser.

use thiserror::Error;

use crate::types::Language;

/// Why a session produced no transcript
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VoiceInputError {
    #[error("Voice input not supported in this browser.")]
    Unsupported,

    /// Error code reported by the engine (`no-speech`, `not-allowed`, ...)
    #[error("{0}")]
    Recognition(String),
}

/// Settings for one recognition session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionRequest {
    pub id: u64,
    pub locale: &'static str,
    pub continuous: bool,
    pub interim_results: bool,
}

/// A speech-to-text engine
pub trait SpeechRecognizer {
    fn is_supported(&self) -> bool;
    fn start(&mut self, request: &RecognitionRequest) -> Result<(), VoiceInputError>;
    fn abort(&mut self);
}

/// Tracks the active session and its outcome
#[derive(Debug)]
pub struct VoiceInput<R: SpeechRecognizer> {
    recognizer: R,
    listening: Option<u64>,
    next_id: u64,
    transcript: String,
    error: Option<VoiceInputError>,
}

impl<R: SpeechRecognizer> VoiceInput<R> {
    pub fn new(recognizer: R) -> Self {
        Self {
            recognizer,
            listening: None,
            next_id: 1,
            transcript: String::new(),
            error: None,
        }
    }

    pub fn is_listening(&self) -> bool {
        self.listening.is_some()
    }

    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    pub fn error(&self) -> Option<&VoiceInputError> {
        self.error.as_ref()
    }

    /// Start a session in `language`, aborting any session still running
    pub fn start_listening(&mut self, language: Language) -> Result<u64, VoiceInputError> {
        if !self.recognizer.is_supported() {
            self.error = Some(VoiceInputError::Unsupported);
            return Err(VoiceInputError::Unsupported);
        }

        if self.listening.take().is_some() {
            self.recognizer.abort();
        }
        self.error = None;

        let id = self.next_id;
        self.next_id += 1;

        let request = RecognitionRequest {
            id,
            locale: language.speech_locale(),
            continuous: false,
            interim_results: false,
        };
        if let Err(e) = self.recognizer.start(&request) {
            self.error = Some(e.clone());
            return Err(e);
        }

        self.listening = Some(id);
        Ok(id)
    }

    /// Engine delivered the final transcript. Returns whether it was accepted.
    pub fn on_result(&mut self, id: u64, transcript: &str) -> bool {
        if self.listening != Some(id) {
            return false;
        }
        self.transcript = transcript.to_string();
        self.listening = None;
        true
    }

    /// Engine reported an error. Returns whether it belongs to the active session.
    pub fn on_error(&mut self, id: u64, code: &str) -> bool {
        if self.listening != Some(id) {
            return false;
        }
        self.error = Some(VoiceInputError::Recognition(code.to_string()));
        self.listening = None;
        true
    }

    /// Engine stopped listening, with or without a result
    pub fn on_end(&mut self, id: u64) {
        if self.listening == Some(id) {
            self.listening = None;
        }
    }

    /// Abort the active session. Returns whether one was running.
    pub fn cancel(&mut self) -> bool {
        match self.listening.take() {
            Some(_) => {
                self.recognizer.abort();
                true
            }
            None => false,
        }
    }

    pub fn reset_transcript(&mut self) {
        self.transcript.clear();
    }

    pub fn recognizer(&self) -> &R {
        &self.recognizer
    }
}
