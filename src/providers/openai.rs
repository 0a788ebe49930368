use std::time::Duration;
use async_trait::async_trait;
use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use log::{debug, trace, error};
use serde::Serialize;
use crate::config::EndpointConfig;
use crate::error::{Error, Result};
use crate::providers::sse::{SseEvent, SseLineParser};
use crate::providers::{ChunkStream, Provider};
use crate::request::{
  ChatCompletionChunk, ChatCompletionResponse, ChatRequest, Chunk,
  CompletionRequest, Endpoint, Response, TextCompletionResponse,
};

/// Client for an OpenAI-compatible `/v1` API
pub struct OpenAiCompatClient
{   api_base: String
  , api_key: String
  , http_client: reqwest::Client
}

impl OpenAiCompatClient
{   pub fn new(config: &EndpointConfig) -> Self
    {   debug!("Creating OpenAiCompatClient for {}", config.api_base());
        OpenAiCompatClient
        {   api_base: config.api_base()
          , api_key: config.api_key.clone()
          , http_client: reqwest::Client::new()
        }
    }

    /// POST a JSON body; any non-success status becomes a classified error
    async fn post<B: Serialize + std::fmt::Debug + Sync>(
      &self
    , endpoint: Endpoint
    , body: &B
    , timeout_secs: u64
    ) -> Result<reqwest::Response>
    {   let url = format!("{}{}", self.api_base, endpoint.path());
        debug!("POST {}", url);
        trace!("Request body: {:?}", body);

        let response = self.http_client
          .post(&url)
          .header("Authorization", format!("Bearer {}", self.api_key))
          .header("Content-Type", "application/json")
          .timeout(Duration::from_secs(timeout_secs))
          .json(body)
          .send()
          .await
          .map_err(|e| {
            error!("HTTP error: {}", e);
            Error::from_transport(e)
          })?;

        let status = response.status();
        trace!("Response status: {}", status);

        if !status.is_success()
        {   let error_text = response.text().await
              .unwrap_or_else(|_|
                "Unknown error".to_string()
              );
            error!("API error {}: {}", status, error_text);
            return Err(Error::from_status(status, &error_text));
        }

        Ok(response)
    }
}

#[async_trait]
impl Provider for OpenAiCompatClient
{   async fn send_chat(&self, request: &ChatRequest)
      -> Result<Response>
    {   let response = self
          .post(Endpoint::ChatCompletions, request, request.timeout_secs)
          .await?;

        let chat_response: ChatCompletionResponse
          = response.json().await.map_err(|e| {
            error!("Parse error: {}", e);
            Error::from_transport(e)
          })?;

        chat_response.into_response()
    }

    async fn send_completion(&self, request: &CompletionRequest)
      -> Result<Response>
    {   let response = self
          .post(request.endpoint(), request, request.timeout_secs)
          .await?;

        let completion_response: TextCompletionResponse
          = response.json().await.map_err(|e| {
            error!("Parse error: {}", e);
            Error::from_transport(e)
          })?;

        completion_response.into_response()
    }

    async fn stream_chat(&self, request: &ChatRequest)
      -> Result<ChunkStream>
    {   let mut request = request.clone();
        request.stream = true;

        let response = self
          .post(Endpoint::ChatCompletions, &request, request.timeout_secs)
          .await?;

        Ok(Box::pin(chunk_stream(response.bytes_stream())))
    }
}

/// Turn an SSE byte stream into chunks, dropping the `[DONE]` sentinel
fn chunk_stream(
  byte_stream: impl Stream<Item = reqwest::Result<Bytes>> + Send + 'static
) -> impl Stream<Item = Result<Chunk>> + Send
{   async_stream::stream!
    {   let mut byte_stream = Box::pin(byte_stream);
        let mut parser = SseLineParser::new();

        while let Some(next) = byte_stream.next().await
        {   let bytes = match next
            {   Ok(bytes) => bytes
              , Err(e) => {
                  error!("Stream read error: {}", e);
                  yield Err(Error::from_transport(e));
                  return;
                }
            };
            for event in parser.push(&bytes)
            {   if let Some(chunk) = decode_event(&event)
                {   yield chunk;
                }
            }
        }

        if let Some(event) = parser.flush()
        {   if let Some(chunk) = decode_event(&event)
            {   yield chunk;
            }
        }
        debug!("Stream closed by server");
    }
}

fn decode_event(event: &SseEvent) -> Option<Result<Chunk>>
{   if event.is_done()
    {   trace!("Skipping [DONE] sentinel");
        return None;
    }
    trace!("Chunk data: {}", event.data);
    Some(
      serde_json::from_str::<ChatCompletionChunk>(&event.data)
        .map(Chunk::from)
        .map_err(|e| {
          error!("Chunk parse error: {}", e);
          Error::Other(format!("Invalid stream chunk: {}", e))
        })
    )
}
