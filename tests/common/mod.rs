#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use async_trait::async_trait;
use futures_util::{stream, StreamExt};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use allm_smoke::console::Console;
use allm_smoke::runner::ScenarioPrompts;
use allm_smoke::request::{ChatRequest, Chunk, CompletionRequest, Response};
use allm_smoke::{ChunkStream, EndpointConfig, Error, Harness, Provider, Result};

/// Canned provider that records what it was asked
pub struct FakeProvider
{   pub chat: Result<Response>
  , pub completion: Result<Response>
  , pub chunks: Vec<Result<Chunk>>
  , /// Stream never ends after the canned chunks
    pub hang_after_chunks: bool
  , pub calls: AtomicUsize
  , pub last_completion: Mutex<Option<CompletionRequest>>
  , pub last_chat: Mutex<Option<ChatRequest>>
}

impl Default for FakeProvider
{   fn default() -> Self
    {   FakeProvider
        {   chat: Err(Error::Other("no chat reply".to_string()))
          , completion: Err(Error::Other("no completion".to_string()))
          , chunks: vec![]
          , hang_after_chunks: false
          , calls: AtomicUsize::new(0)
          , last_completion: Mutex::new(None)
          , last_chat: Mutex::new(None)
        }
    }
}

impl FakeProvider
{   pub fn calls(&self) -> usize
    {   self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Provider for FakeProvider
{   async fn send_chat(&self, request: &ChatRequest)
      -> Result<Response>
    {   self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_chat.lock().unwrap() = Some(request.clone());
        self.chat.clone()
    }

    async fn send_completion(&self, request: &CompletionRequest)
      -> Result<Response>
    {   self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_completion.lock().unwrap() = Some(request.clone());
        self.completion.clone()
    }

    async fn stream_chat(&self, request: &ChatRequest)
      -> Result<ChunkStream>
    {   self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_chat.lock().unwrap() = Some(request.clone());
        let canned = stream::iter(self.chunks.clone());
        if self.hang_after_chunks
        {   Ok(Box::pin(canned.chain(stream::pending())))
        } else
        {   Ok(Box::pin(canned))
        }
    }
}

/// Mock server whose root answers like a ready, authenticated server
pub async fn ready_server() -> MockServer
{   let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/"))
      .respond_with(ResponseTemplate::new(200).set_body_string("Copilot API is running"))
      .mount(&server)
      .await;
    server
}

pub fn config_for(server: &MockServer) -> EndpointConfig
{   EndpointConfig::default()
      .with_server_url(server.uri())
      .with_probe_timeout_secs(2)
}

/// URL on which nothing is listening
pub fn refused_url() -> String
{   let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

pub fn harness<P: Provider>(
  config: EndpointConfig
, provider: P
) -> Harness<P, Vec<u8>>
{   harness_with_prompts(config, provider, ScenarioPrompts::default())
}

pub fn harness_with_prompts<P: Provider>(
  config: EndpointConfig
, provider: P
, prompts: ScenarioPrompts
) -> Harness<P, Vec<u8>>
{   Harness::with_provider(config, provider, prompts, Console::new(Vec::new()))
}

pub fn printed<P: Provider>(harness: Harness<P, Vec<u8>>) -> String
{   String::from_utf8(harness.into_console().into_inner()).unwrap()
}
