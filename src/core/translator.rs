// Translator State
// Text, language and personality selection, and the request built from them

use serde::Serialize;

/// Outcome of the last submit
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestStatus {
    #[default]
    Idle,
    /// A request was built and is shown in the preview
    Prepared,
    /// The last submit failed validation
    Rejected,
}

/// Transitions of the translator state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslatorAction {
    SetSourceText(String),
    /// `None` means auto-detect
    SetSourceLang(Option<String>),
    SetTargetLang(String),
    SetTargetPersonality(String),
    PushChar(char),
    PopChar,
    ClearText,
    RequestPrepared,
    RequestRejected(String),
}

/// Request validation errors
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslatorError {
    #[error("Enter some text to translate")]
    EmptyText,

    #[error("Choose a {0} first")]
    MissingTarget(&'static str),
}

/// Payload of the translate endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateRequest {
    pub text: String,
    pub target_lang: String,
    pub target_personality: String,
    pub input_lang: Option<String>,
}

impl TranslateRequest {
    /// YAML rendering used by the request preview
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatorState {
    pub status: RequestStatus,
    pub source_text: String,
    pub source_lang: Option<String>,
    pub target_lang: String,
    pub target_personality: String,
    pub last_error: Option<String>,
    pub max_source_length: usize,
}

impl TranslatorState {
    pub fn new(target_lang: impl Into<String>, personality: impl Into<String>, max_source_length: usize) -> Self {
        Self {
            status: RequestStatus::Idle,
            source_text: String::new(),
            source_lang: None,
            target_lang: target_lang.into(),
            target_personality: personality.into(),
            last_error: None,
            max_source_length,
        }
    }

    /// Characters entered so far
    pub fn char_count(&self) -> usize {
        self.source_text.chars().count()
    }

    /// Apply an action and return the next state
    pub fn reduce(&self, action: TranslatorAction) -> TranslatorState {
        let mut next = self.clone();
        match action {
            TranslatorAction::SetSourceText(text) => {
                next.source_text = text.chars().take(next.max_source_length).collect();
            }
            TranslatorAction::SetSourceLang(lang) => next.source_lang = lang,
            TranslatorAction::SetTargetLang(lang) => next.target_lang = lang,
            TranslatorAction::SetTargetPersonality(personality) => {
                next.target_personality = personality;
            }
            TranslatorAction::PushChar(c) => {
                if next.char_count() < next.max_source_length {
                    next.source_text.push(c);
                }
            }
            TranslatorAction::PopChar => {
                next.source_text.pop();
            }
            TranslatorAction::ClearText => next.source_text.clear(),
            TranslatorAction::RequestPrepared => {
                next.status = RequestStatus::Prepared;
                next.last_error = None;
            }
            TranslatorAction::RequestRejected(message) => {
                next.status = RequestStatus::Rejected;
                next.last_error = Some(message);
            }
        }
        next
    }

    /// Validate the current selection and build the request payload
    pub fn build_request(&self) -> Result<TranslateRequest, TranslatorError> {
        let text = self.source_text.trim();
        if text.is_empty() {
            return Err(TranslatorError::EmptyText);
        }
        if self.target_lang.is_empty() {
            return Err(TranslatorError::MissingTarget("target language"));
        }
        if self.target_personality.is_empty() {
            return Err(TranslatorError::MissingTarget("personality"));
        }
        Ok(TranslateRequest {
            text: text.to_string(),
            target_lang: self.target_lang.clone(),
            target_personality: self.target_personality.clone(),
            input_lang: self.source_lang.clone(),
        })
    }
}
