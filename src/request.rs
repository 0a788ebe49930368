//! Request, response and chunk types shared by providers and runners

use serde::{Deserialize, Serialize};
use crate::error::{Error, Result};

/// Speaker of a chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role
{   System
  , User
  , Assistant
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage
{   pub role: Role
  , pub content: String
}

impl ChatMessage
{   pub fn system(content: impl Into<String>) -> Self
    {   ChatMessage { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self
    {   ChatMessage { role: Role::User, content: content.into() }
    }
}

/// Which API route a request is addressed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint
{   /// Structured multi-turn chat
    ChatCompletions
  , /// Legacy single-prompt completion
    Completions
}

impl Endpoint
{   pub fn path(&self) -> &'static str
    {   match self
        {   Endpoint::ChatCompletions => "/chat/completions"
          , Endpoint::Completions => "/completions"
        }
    }
}

/// Chat completion request
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest
{   /// Label only; the server picks the real model
    pub model: String
  , pub messages: Vec<ChatMessage>
  , pub temperature: f32
  , pub max_tokens: usize
  , #[serde(skip)]
    pub timeout_secs: u64
  , #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub stream: bool
}

/// Legacy text completion request
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest
{   pub model: String
  , pub prompt: String
  , pub temperature: f32
  , pub max_tokens: usize
  , pub top_p: f32
  , pub frequency_penalty: f32
  , pub presence_penalty: f32
  , #[serde(skip)]
    pub timeout_secs: u64
}

impl CompletionRequest
{   /// Completion requests always go to the legacy route
    pub fn endpoint(&self) -> Endpoint
    {   Endpoint::Completions
    }
}

/// Text of the first choice of a non-streaming response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response
{   pub text: String
}

/// One unit of a streamed response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chunk
{   /// `None` for keep-alive / role-only / finish chunks
    pub content: Option<String>
}

impl Chunk
{   pub fn text(content: impl Into<String>) -> Self
    {   Chunk { content: Some(content.into()) }
    }

    pub fn empty() -> Self
    {   Chunk { content: None }
    }
}

// ===== Wire decoding =====

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse
{   #[serde(default)]
    pub choices: Vec<ChatChoice>
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice
{   #[serde(default)]
    pub message: Option<WireMessage>
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireMessage
{   #[serde(default)]
    pub content: Option<String>
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextCompletionResponse
{   #[serde(default)]
    pub choices: Vec<TextChoice>
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextChoice
{   #[serde(default)]
    pub text: Option<String>
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionChunk
{   #[serde(default)]
    pub choices: Vec<ChunkChoice>
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChunkChoice
{   #[serde(default)]
    pub delta: Option<WireMessage>
}

impl ChatCompletionResponse
{   pub fn into_response(self) -> Result<Response>
    {   let choice = self.choices.into_iter().next()
          .ok_or_else(|| Error::Other(
            "API response contained no choices".to_string()
          ))?;
        choice.message
          .and_then(|m| m.content)
          .map(|text| Response { text })
          .ok_or_else(|| Error::Other(
            "API response choice has no message content".to_string()
          ))
    }
}

impl TextCompletionResponse
{   pub fn into_response(self) -> Result<Response>
    {   let choice = self.choices.into_iter().next()
          .ok_or_else(|| Error::Other(
            "API response contained no choices".to_string()
          ))?;
        choice.text
          .map(|text| Response { text })
          .ok_or_else(|| Error::Other(
            "API response choice has no text".to_string()
          ))
    }
}

impl From<ChatCompletionChunk> for Chunk
{   fn from(wire: ChatCompletionChunk) -> Self
    {   Chunk
        {   content: wire.choices.into_iter().next()
              .and_then(|c| c.delta)
              .and_then(|d| d.content)
        }
    }
}
