//! Voice-agent control plane request assembly.
//!
//! Every control plane call is `POST /?Action=<action>&Version=<version>` with
//! a JSON body. [`OpenApiClient::build_request`] produces that request,
//! unsigned; pass it to
//! [`RequestSigner::sign_http_request`](crate::signer::RequestSigner::sign_http_request)
//! before sending.

use std::fmt;
use std::str::FromStr;

use aigc_relay_core::RelayConfig;
use http::header::CONTENT_TYPE;
use serde::Serialize;

use crate::canonical::build_canonical_query_string;
use crate::error::AuthError;

/// Default control plane host.
pub const DEFAULT_API_HOST: &str = "rtc.volcengineapi.com";

/// Default OpenAPI version.
pub const DEFAULT_API_VERSION: &str = "2024-12-01";

/// Control plane actions the relay invokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Start a voice agent in a room.
    StartVoiceChat,
    /// Stop a running voice agent.
    StopVoiceChat,
    /// Send a command to a running voice agent.
    UpdateVoiceChat,
}

impl Action {
    /// The `Action` query parameter value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StartVoiceChat => "StartVoiceChat",
            Self::StopVoiceChat => "StopVoiceChat",
            Self::UpdateVoiceChat => "UpdateVoiceChat",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Commands accepted by `UpdateVoiceChat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateCommand {
    /// Interrupt the agent's speech.
    Interrupt,
    /// Return the result of a function call.
    Function,
    /// Speak the given text.
    ExternalTextToSpeech,
    /// Feed extra prompts to the model.
    ExternalPromptsForLlm,
    /// Feed text to the model as if spoken.
    ExternalTextToLlm,
    /// Force the end of the current utterance.
    FinishSpeechRecognition,
}

impl UpdateCommand {
    /// The `Command` value sent in the request body.
    #[must_use]
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Interrupt => "Interrupt",
            Self::Function => "Function",
            Self::ExternalTextToSpeech => "ExternalTextToSpeech",
            Self::ExternalPromptsForLlm => "ExternalPromptsForLLM",
            Self::ExternalTextToLlm => "ExternalTextToLLM",
            Self::FinishSpeechRecognition => "FinishSpeechRecognition",
        }
    }

    /// Whether the command carries a `Message`.
    #[must_use]
    pub fn requires_message(self) -> bool {
        matches!(
            self,
            Self::Function
                | Self::ExternalTextToSpeech
                | Self::ExternalPromptsForLlm
                | Self::ExternalTextToLlm
        )
    }

    /// Whether the command carries an `InterruptMode`.
    #[must_use]
    pub fn requires_interrupt_mode(self) -> bool {
        matches!(self, Self::ExternalTextToSpeech | Self::ExternalTextToLlm)
    }

    /// Check an `InterruptMode` value: only 1, 2, and 3 are defined.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MalformedRequest`] for any other value.
    pub fn check_interrupt_mode(mode: u8) -> Result<u8, AuthError> {
        if (1..=3).contains(&mode) {
            Ok(mode)
        } else {
            Err(AuthError::MalformedRequest(format!(
                "interrupt mode must be 1, 2, or 3, got {mode}"
            )))
        }
    }
}

impl FromStr for UpdateCommand {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "interrupt" => Ok(Self::Interrupt),
            "function" => Ok(Self::Function),
            "external_text_to_speech" => Ok(Self::ExternalTextToSpeech),
            "external_prompts_for_llm" => Ok(Self::ExternalPromptsForLlm),
            "external_text_to_llm" => Ok(Self::ExternalTextToLlm),
            "finish_speech_recognition" => Ok(Self::FinishSpeechRecognition),
            other => Err(AuthError::MalformedRequest(format!(
                "unknown update command: {other}"
            ))),
        }
    }
}

/// Body of a `StopVoiceChat` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StopVoiceChatBody {
    /// RTC application id.
    pub app_id: String,
    /// Room the agent runs in.
    pub room_id: String,
    /// Task id the agent was started with.
    pub task_id: String,
}

/// Body of an `UpdateVoiceChat` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateVoiceChatBody {
    /// RTC application id.
    pub app_id: String,
    /// Room the agent runs in.
    pub room_id: String,
    /// Task id the agent was started with.
    pub task_id: String,
    /// Wire name of the command.
    pub command: &'static str,
    /// Command payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// How the command interrupts current speech.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interrupt_mode: Option<u8>,
}

impl UpdateVoiceChatBody {
    /// Build an update body, checking that `command` gets the fields it needs.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MalformedRequest`] if a required message or
    /// interrupt mode is missing, the interrupt mode is out of range, or a
    /// `Function` message does not name the tool call it answers.
    pub fn new(
        app_id: impl Into<String>,
        room_id: impl Into<String>,
        task_id: impl Into<String>,
        command: UpdateCommand,
        message: Option<String>,
        interrupt_mode: Option<u8>,
    ) -> Result<Self, AuthError> {
        if command.requires_message() && message.is_none() {
            return Err(AuthError::MalformedRequest(format!(
                "{} requires a message",
                command.wire_name()
            )));
        }
        if let (UpdateCommand::Function, Some(message)) = (command, &message) {
            check_tool_call_message(message)?;
        }
        if command.requires_interrupt_mode() && interrupt_mode.is_none() {
            return Err(AuthError::MalformedRequest(format!(
                "{} requires an interrupt mode",
                command.wire_name()
            )));
        }
        let interrupt_mode = interrupt_mode
            .map(UpdateCommand::check_interrupt_mode)
            .transpose()?;

        Ok(Self {
            app_id: app_id.into(),
            room_id: room_id.into(),
            task_id: task_id.into(),
            command: command.wire_name(),
            message,
            interrupt_mode,
        })
    }
}

/// A `Function` message must be JSON whose first `tool_calls` entry has an `id`.
fn check_tool_call_message(message: &str) -> Result<(), AuthError> {
    let value: serde_json::Value = serde_json::from_str(message)
        .map_err(|e| AuthError::MalformedRequest(format!("function message is not JSON: {e}")))?;
    let has_id = value
        .get("tool_calls")
        .and_then(|calls| calls.get(0))
        .and_then(|call| call.get("id"))
        .is_some();
    if has_id {
        Ok(())
    } else {
        Err(AuthError::MalformedRequest(
            "function message has no tool_calls[0].id".to_owned(),
        ))
    }
}

/// Builds control plane requests for one host and API version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenApiClient {
    host: String,
    version: String,
}

impl Default for OpenApiClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_HOST, DEFAULT_API_VERSION)
    }
}

impl OpenApiClient {
    /// Create a builder for `host` and `version`.
    #[must_use]
    pub fn new(host: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            version: version.into(),
        }
    }

    /// Take host and version from the relay configuration.
    #[must_use]
    pub fn from_config(config: &RelayConfig) -> Self {
        Self::new(&config.api_host, &config.api_version)
    }

    /// The control plane host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Build the unsigned `POST` request for `action` with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MalformedRequest`] if the body cannot be serialized
    /// or the host does not form a valid URI.
    ///
    /// # Examples
    ///
    /// ```
    /// use aigc_relay_auth::openapi::{Action, OpenApiClient};
    ///
    /// let request = OpenApiClient::default()
    ///     .build_request(Action::StopVoiceChat, &serde_json::json!({"TaskId": "t1"}))
    ///     .unwrap();
    /// assert_eq!(
    ///     request.uri().to_string(),
    ///     "https://rtc.volcengineapi.com/?Action=StopVoiceChat&Version=2024-12-01"
    /// );
    /// ```
    pub fn build_request<T: Serialize + ?Sized>(
        &self,
        action: Action,
        body: &T,
    ) -> Result<http::Request<Vec<u8>>, AuthError> {
        let body = serde_json::to_vec(body)
            .map_err(|e| AuthError::MalformedRequest(format!("unserializable body: {e}")))?;

        let query = build_canonical_query_string(&[
            ("Action", action.as_str()),
            ("Version", self.version.as_str()),
        ]);

        http::Request::builder()
            .method(http::Method::POST)
            .uri(format!("https://{}/?{query}", self.host))
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .map_err(|e| AuthError::MalformedRequest(e.to_string()))
    }
}
