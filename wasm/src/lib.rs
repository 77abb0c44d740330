//! WebAssembly module for the KisanSahayak advisory client
//!
//! Provides client-side helpers for:
//! - Read-aloud text and speech locales
//! - Browser speech playback with a single active utterance
//! - Voice input for the onboarding fields
//! - Language toggling and offline placeholders
//! - Navigator connectivity checks

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::speech::*;
pub use shared::types::*;
pub use shared::validation::*;
pub use shared::voice::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::log_1(&"KisanSahayak client module loaded".into());
}

fn parse_language(language: &str) -> Result<Language, JsValue> {
    language.parse::<Language>().map_err(|e| JsValue::from_str(&e.to_string()))
}

fn parse_advisory(advisory_json: &str) -> Result<AdvisoryContent, JsValue> {
    serde_json::from_str(advisory_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid advisory JSON: {}", e)))
}

/// Spoken form of an advisory (JSON as returned by the advisory endpoint)
#[wasm_bindgen]
pub fn advisory_read_aloud_text(advisory_json: &str) -> Result<String, JsValue> {
    let content = parse_advisory(advisory_json)?;
    Ok(read_aloud_text(&content))
}

/// BCP 47 locale for speech output in `language`
#[wasm_bindgen]
pub fn language_speech_locale(language: &str) -> Result<String, JsValue> {
    Ok(parse_language(language)?.speech_locale().to_string())
}

/// Language after `language` in the English, Hindi, Tamil cycle
#[wasm_bindgen]
pub fn next_language(language: &str) -> Result<String, JsValue> {
    Ok(parse_language(language)?.next().to_string())
}

/// Placeholder shown when offline with nothing saved
#[wasm_bindgen]
pub fn offline_placeholder_json() -> Result<String, JsValue> {
    serde_json::to_string(&AdvisoryResult::no_connection_placeholder())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Whether the browser currently reports a network connection
#[wasm_bindgen]
pub fn is_navigator_online() -> bool {
    web_sys::window()
        .map(|window| window.navigator().on_line())
        .unwrap_or(false)
}

/// Browser `speechSynthesis` engine
///
/// Utterance ids that finish are queued in `ended` and drained by the player.
struct BrowserSynthesizer {
    synthesis: web_sys::SpeechSynthesis,
    ended: Rc<RefCell<Vec<u64>>>,
}

impl SpeechSynthesizer for BrowserSynthesizer {
    fn speak(&mut self, utterance: &Utterance) {
        let spoken = match web_sys::SpeechSynthesisUtterance::new_with_text(&utterance.text) {
            Ok(spoken) => spoken,
            Err(e) => {
                web_sys::console::error_1(&e);
                return;
            }
        };
        spoken.set_lang(utterance.locale);

        let ended = Rc::clone(&self.ended);
        let id = utterance.id;
        let on_end = Closure::once_into_js(move || {
            ended.borrow_mut().push(id);
        });
        spoken.set_onend(Some(on_end.unchecked_ref()));

        self.synthesis.speak(&spoken);
    }

    fn cancel(&mut self) {
        self.synthesis.cancel();
    }
}

/// Read-aloud control bound to the browser speech engine
#[wasm_bindgen]
pub struct ReadAloudPlayer {
    inner: ReadAloud<BrowserSynthesizer>,
    ended: Rc<RefCell<Vec<u64>>>,
}

#[wasm_bindgen]
impl ReadAloudPlayer {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<ReadAloudPlayer, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;
        let synthesis = window.speech_synthesis()?;
        let ended = Rc::new(RefCell::new(Vec::new()));

        Ok(ReadAloudPlayer {
            inner: ReadAloud::new(BrowserSynthesizer {
                synthesis,
                ended: Rc::clone(&ended),
            }),
            ended,
        })
    }

    fn drain_ended(&mut self) {
        let ended: Vec<u64> = self.ended.borrow_mut().drain(..).collect();
        for id in ended {
            self.inner.finished(id);
        }
    }

    /// Speak the advisory if idle, stop if speaking. Returns whether speech started.
    pub fn toggle(&mut self, advisory_json: &str, language: &str) -> Result<bool, JsValue> {
        self.drain_ended();
        let content = parse_advisory(advisory_json)?;
        let language = parse_language(language)?;
        Ok(matches!(
            self.inner.toggle(&content, language),
            SpeechState::Speaking(_)
        ))
    }

    pub fn stop(&mut self) -> bool {
        self.drain_ended();
        self.inner.stop()
    }

    #[wasm_bindgen(getter)]
    pub fn speaking(&mut self) -> bool {
        self.drain_ended();
        self.inner.is_speaking()
    }
}

/// Browser `SpeechRecognition` engine, falling back to the `webkit` prefix
struct BrowserRecognizer {
    constructor: Option<js_sys::Function>,
    active: Option<web_sys::SpeechRecognition>,
    owner: Weak<RefCell<VoiceInput<BrowserRecognizer>>>,
    on_transcript: js_sys::Function,
    on_error: Option<js_sys::Function>,
}

fn recognition_constructor() -> Option<js_sys::Function> {
    let window = web_sys::window()?;
    ["SpeechRecognition", "webkitSpeechRecognition"]
        .iter()
        .filter_map(|name| js_sys::Reflect::get(&window, &JsValue::from_str(name)).ok())
        .find(|value| value.is_function())
        .map(|value| value.unchecked_into::<js_sys::Function>())
}

fn first_transcript(event: &web_sys::SpeechRecognitionEvent) -> Option<String> {
    let result = event.results()?.get(0)?;
    Some(result.get(0)?.transcript())
}

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

impl SpeechRecognizer for BrowserRecognizer {
    fn is_supported(&self) -> bool {
        self.constructor.is_some()
    }

    fn start(&mut self, request: &RecognitionRequest) -> Result<(), VoiceInputError> {
        let constructor = self
            .constructor
            .as_ref()
            .ok_or(VoiceInputError::Unsupported)?;
        let recognition: web_sys::SpeechRecognition =
            js_sys::Reflect::construct(constructor, &js_sys::Array::new())
                .map_err(|e| VoiceInputError::Recognition(describe(&e)))?
                .unchecked_into();

        recognition.set_continuous(request.continuous);
        recognition.set_interim_results(request.interim_results);
        recognition.set_lang(request.locale);

        let id = request.id;

        let owner = self.owner.clone();
        let callback = self.on_transcript.clone();
        let on_result = Closure::once_into_js(move |event: web_sys::SpeechRecognitionEvent| {
            let Some(text) = first_transcript(&event) else {
                return;
            };
            let accepted = match owner.upgrade() {
                Some(voice) => voice.borrow_mut().on_result(id, &text),
                None => false,
            };
            if accepted {
                let _ = callback.call1(&JsValue::NULL, &JsValue::from_str(&text));
            }
        });
        recognition.set_onresult(Some(on_result.unchecked_ref()));

        let owner = self.owner.clone();
        let callback = self.on_error.clone();
        let on_error = Closure::once_into_js(move |event: JsValue| {
            let code = js_sys::Reflect::get(&event, &JsValue::from_str("error"))
                .ok()
                .and_then(|value| value.as_string())
                .unwrap_or_else(|| "unknown".to_string());
            web_sys::console::error_2(&"Speech recognition error".into(), &code.as_str().into());
            let accepted = match owner.upgrade() {
                Some(voice) => voice.borrow_mut().on_error(id, &code),
                None => false,
            };
            if let (true, Some(callback)) = (accepted, callback) {
                let _ = callback.call1(&JsValue::NULL, &JsValue::from_str(&code));
            }
        });
        recognition.set_onerror(Some(on_error.unchecked_ref()));

        let owner = self.owner.clone();
        let on_end = Closure::once_into_js(move || {
            if let Some(voice) = owner.upgrade() {
                voice.borrow_mut().on_end(id);
            }
        });
        recognition.set_onend(Some(on_end.unchecked_ref()));

        recognition
            .start()
            .map_err(|e| VoiceInputError::Recognition(describe(&e)))?;
        self.active = Some(recognition);
        Ok(())
    }

    fn abort(&mut self) {
        if let Some(recognition) = self.active.take() {
            recognition.abort();
        }
    }
}

/// Whether the browser offers speech recognition
#[wasm_bindgen]
pub fn is_voice_input_supported() -> bool {
    recognition_constructor().is_some()
}

/// Voice input bound to the browser speech recognizer
///
/// `on_transcript` receives the final transcript of each session;
/// `on_error` receives the engine's error code.
#[wasm_bindgen]
pub struct VoiceInputSession {
    inner: Rc<RefCell<VoiceInput<BrowserRecognizer>>>,
}

#[wasm_bindgen]
impl VoiceInputSession {
    #[wasm_bindgen(constructor)]
    pub fn new(
        on_transcript: js_sys::Function,
        on_error: Option<js_sys::Function>,
    ) -> VoiceInputSession {
        let constructor = recognition_constructor();
        let inner = Rc::new_cyclic(|owner| {
            RefCell::new(VoiceInput::new(BrowserRecognizer {
                constructor,
                active: None,
                owner: owner.clone(),
                on_transcript,
                on_error,
            }))
        });
        VoiceInputSession { inner }
    }

    /// Listen for one phrase in `language`
    pub fn start(&self, language: &str) -> Result<(), JsValue> {
        let language = parse_language(language)?;
        self.inner
            .borrow_mut()
            .start_listening(language)
            .map(|_| ())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn cancel(&self) -> bool {
        self.inner.borrow_mut().cancel()
    }

    #[wasm_bindgen(getter)]
    pub fn listening(&self) -> bool {
        self.inner.borrow().is_listening()
    }

    #[wasm_bindgen(getter)]
    pub fn transcript(&self) -> String {
        self.inner.borrow().transcript().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn error(&self) -> Option<String> {
        self.inner.borrow().error().map(|e| e.to_string())
    }

    #[wasm_bindgen(js_name = resetTranscript)]
    pub fn reset_transcript(&self) {
        self.inner.borrow_mut().reset_transcript();
    }
}
