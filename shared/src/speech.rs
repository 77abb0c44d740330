//! Read-aloud support
//!
//! Composes the spoken form of an advisory and coordinates a speech engine so
//! that at most one utterance is active at a time. The engine itself (browser
//! `speechSynthesis`, a native TTS) sits behind [`SpeechSynthesizer`].

use crate::models::AdvisoryContent;
use crate::types::Language;

/// Text spoken for an advisory: title, each action item, then the alert level
pub fn read_aloud_text(content: &AdvisoryContent) -> String {
    format!(
        "{}. {}. Alert Level: {}",
        content.title,
        content.action_items.join(". "),
        content.alert_level
    )
}

/// One request to speak
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    pub id: u64,
    pub text: String,
    pub locale: &'static str,
}

/// A speech output engine
pub trait SpeechSynthesizer {
    fn speak(&mut self, utterance: &Utterance);
    fn cancel(&mut self);
}

/// Outcome of a toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechState {
    Speaking(u64),
    Idle,
}

/// Keeps at most one utterance active on the wrapped engine
#[derive(Debug)]
pub struct ReadAloud<S: SpeechSynthesizer> {
    synthesizer: S,
    active: Option<u64>,
    next_id: u64,
}

impl<S: SpeechSynthesizer> ReadAloud<S> {
    pub fn new(synthesizer: S) -> Self {
        Self {
            synthesizer,
            active: None,
            next_id: 1,
        }
    }

    pub fn is_speaking(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_utterance(&self) -> Option<u64> {
        self.active
    }

    /// Speak `text`, stopping whatever is currently playing first
    pub fn start(&mut self, text: impl Into<String>, language: Language) -> u64 {
        if self.active.take().is_some() {
            self.synthesizer.cancel();
        }

        let id = self.next_id;
        self.next_id += 1;

        let utterance = Utterance {
            id,
            text: text.into(),
            locale: language.speech_locale(),
        };
        self.synthesizer.speak(&utterance);
        self.active = Some(id);
        id
    }

    /// Stop playback. Returns whether anything was playing.
    pub fn stop(&mut self) -> bool {
        match self.active.take() {
            Some(_) => {
                self.synthesizer.cancel();
                true
            }
            None => false,
        }
    }

    /// Speak the advisory if idle, stop if speaking
    pub fn toggle(&mut self, content: &AdvisoryContent, language: Language) -> SpeechState {
        if self.stop() {
            return SpeechState::Idle;
        }
        SpeechState::Speaking(self.start(read_aloud_text(content), language))
    }

    /// Engine callback when an utterance ends. Superseded ids are ignored.
    pub fn finished(&mut self, id: u64) {
        if self.active == Some(id) {
            self.active = None;
        }
    }

    pub fn synthesizer(&self) -> &S {
        &self.synthesizer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AlertLevel;

    #[derive(Debug, Default)]
    struct RecordingSynth {
        spoken: Vec<Utterance>,
        cancels: usize,
    }

    impl SpeechSynthesizer for RecordingSynth {
        fn speak(&mut self, utterance: &Utterance) {
            self.spoken.push(utterance.clone());
        }

        fn cancel(&mut self) {
            self.cancels += 1;
        }
    }

    fn content() -> AdvisoryContent {
        AdvisoryContent {
            title: "Water now".to_string(),
            action_items: vec!["Irrigate at dawn".to_string(), "Mulch beds".to_string()],
            alert_level: AlertLevel::High,
            alert_message: None,
            reasoning: "Heat stress.".to_string(),
        }
    }

    #[test]
    fn test_read_aloud_text() {
        assert_eq!(
            read_aloud_text(&content()),
            "Water now. Irrigate at dawn. Mulch beds. Alert Level: HIGH"
        );
    }

    #[test]
    fn test_start_cancels_active_utterance() {
        let mut speech = ReadAloud::new(RecordingSynth::default());
        let first = speech.start("one", Language::English);
        let second = speech.start("two", Language::Tamil);

        assert_ne!(first, second);
        assert_eq!(speech.active_utterance(), Some(second));
        assert_eq!(speech.synthesizer().cancels, 1);
        assert_eq!(speech.synthesizer().spoken[1].locale, "ta-IN");
    }

    #[test]
    fn test_toggle_stops_when_speaking() {
        let mut speech = ReadAloud::new(RecordingSynth::default());
        let state = speech.toggle(&content(), Language::Hindi);
        assert!(matches!(state, SpeechState::Speaking(_)));
        assert_eq!(speech.synthesizer().spoken[0].locale, "hi-IN");

        assert_eq!(speech.toggle(&content(), Language::Hindi), SpeechState::Idle);
        assert!(!speech.is_speaking());
        assert_eq!(speech.synthesizer().cancels, 1);
    }

    #[test]
    fn test_superseded_finish_is_ignored() {
        let mut speech = ReadAloud::new(RecordingSynth::default());
        let first = speech.start("one", Language::English);
        let second = speech.start("two", Language::English);

        speech.finished(first);
        assert_eq!(speech.active_utterance(), Some(second));

        speech.finished(second);
        assert!(!speech.is_speaking());
    }

    #[test]
    fn test_stop_when_idle_does_not_cancel() {
        let mut speech = ReadAloud::new(RecordingSynth::default());
        assert!(!speech.stop());
        assert_eq!(speech.synthesizer().cancels, 0);
    }

    proptest::proptest! {
        #[test]
        fn prop_read_aloud_mentions_every_item(
            items in proptest::collection::vec("[a-zA-Z ]{1,20}", 1..6)
        ) {
            let mut advisory = content();
            advisory.action_items = items.clone();
            let text = read_aloud_text(&advisory);

            proptest::prop_assert!(text.starts_with("Water now. "));
            proptest::prop_assert!(text.ends_with("Alert Level: HIGH"));
            for item in &items {
                proptest::prop_assert!(text.contains(item.as_str()));
            }
        }

        #[test]
        fn prop_at_most_one_active_utterance(starts in 1usize..8) {
            let mut speech = ReadAloud::new(RecordingSynth::default());
            let mut last = 0;
            for i in 0..starts {
                last = speech.start(format!("line {}", i), Language::English);
            }

            proptest::prop_assert_eq!(speech.active_utterance(), Some(last));
            proptest::prop_assert_eq!(speech.synthesizer().cancels, starts - 1);
        }
    }
}
