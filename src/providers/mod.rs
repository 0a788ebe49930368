//! Provider adapter seam
//!
//! Runners only talk to a [`Provider`]; the HTTP wire format lives
//! behind it in [`openai`].

use std::pin::Pin;
use async_trait::async_trait;
use futures_util::Stream;
use crate::error::Result;
use crate::request::{ChatRequest, Chunk, CompletionRequest, Response};

pub mod openai;
pub mod sse;

pub use openai::OpenAiCompatClient;

/// Live, ordered, finite sequence of chunks; ends when the server
/// closes the response
pub type ChunkStream
  = Pin<Box<dyn Stream<Item = Result<Chunk>> + Send>>;

#[async_trait]
pub trait Provider: Send + Sync
{   async fn send_chat(&self, request: &ChatRequest)
      -> Result<Response>;

    async fn send_completion(&self, request: &CompletionRequest)
      -> Result<Response>;

    async fn stream_chat(&self, request: &ChatRequest)
      -> Result<ChunkStream>;
}
