//! Chat, completion and streaming scenario runners
//!
//! Every scenario probes the server first and sends nothing unless the
//! probe reports it ready. Failures are printed and returned, never
//! retried.

use std::future::Future;
use std::io::{self, Write};
use std::time::Instant;
use async_trait::async_trait;
use futures_util::StreamExt;
use log::{debug, info, warn, error};
use crate::config::{EndpointConfig, CHAT_TIMEOUT_SECS, STREAM_TIMEOUT_SECS};
use crate::console::Console;
use crate::error::{Error, Result};
use crate::probe::AvailabilityProber;
use crate::providers::{OpenAiCompatClient, Provider};
use crate::request::{ChatMessage, ChatRequest, CompletionRequest};
use crate::{Scenario, ScenarioResult};

const CHAT_MODEL: &str = "gpt-4";
const COMPLETION_MODEL: &str = "copilot-codex";
const SYSTEM_PROMPT: &str = "You are a helpful AI assistant.";
const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: usize = 500;

/// Prompt text for each scenario
#[derive(Debug, Clone)]
pub struct ScenarioPrompts
{   pub chat: String
  , pub completion: String
  , pub streaming: String
}

impl Default for ScenarioPrompts
{   fn default() -> Self
    {   ScenarioPrompts
        {   chat: "Explain what a binary search tree is in simple terms."
              .to_string()
          , completion:
              "def factorial(n):\n    # Calculate factorial of n recursively\n    "
              .to_string()
          , streaming: "Write a short story about a programmer who \
              discovers an AI that can predict the future."
              .to_string()
        }
    }
}

/// Runs scenarios one at a time
#[async_trait(?Send)]
pub trait Scenarios
{   async fn run_scenario(&mut self, scenario: Scenario)
      -> ScenarioResult;
}

/// Prober + provider + console for one process
pub struct Harness<P: Provider, W: Write>
{   config: EndpointConfig
  , prompts: ScenarioPrompts
  , prober: AvailabilityProber
  , provider: P
  , console: Console<W>
}

impl Harness<OpenAiCompatClient, io::Stdout>
{   /// Harness against the real server, printing to stdout
    pub fn new(config: EndpointConfig) -> Self
    {   let provider = OpenAiCompatClient::new(&config);
        Harness::with_provider(
          config
        , provider
        , ScenarioPrompts::default()
        , Console::stdout()
        )
    }
}

impl<P: Provider, W: Write> Harness<P, W>
{   pub fn with_provider(
      config: EndpointConfig
    , provider: P
    , prompts: ScenarioPrompts
    , console: Console<W>
    ) -> Self
    {   debug!("Creating harness for {}", config.server_url);
        Harness
        {   prober: AvailabilityProber::new(&config)
          , prompts
          , config
          , provider
          , console
        }
    }

    pub fn provider(&self) -> &P
    {   &self.provider
    }

    pub fn into_console(self) -> Console<W>
    {   self.console
    }

    /// Plain chat completion with a system + user turn
    pub async fn run_chat(&mut self) -> ScenarioResult
    {   self.console.banner("Testing Chat Completion");
        if !self.server_ready().await
        {   return ScenarioResult::skipped();
        }

        let prompt = self.prompts.chat.clone();
        self.console.line(format!("Prompt: {}", prompt));
        self.announce_local_only();

        let request = ChatRequest
        {   model: CHAT_MODEL.to_string()
          , messages: vec![
              ChatMessage::system(SYSTEM_PROMPT)
            , ChatMessage::user(prompt)
            ]
          , temperature: TEMPERATURE
          , max_tokens: MAX_TOKENS
          , timeout_secs: CHAT_TIMEOUT_SECS
          , stream: false
        };

        let start = Instant::now();
        let result = self.provider.send_chat(&request).await;
        let elapsed = start.elapsed().as_secs_f64();

        match result
        {   Ok(response) => {
              info!("Chat completed in {:.2}s", elapsed);
              self.report_completed(elapsed);
              self.console.line("Response:");
              self.console.line(&response.text);
              ScenarioResult::completed(response.text, elapsed)
            }
          , Err(e) => {
              self.report_failure(&e, false);
              ScenarioResult::failed(elapsed)
            }
        }
    }

    /// Legacy single-prompt completion
    pub async fn run_completion(&mut self) -> ScenarioResult
    {   self.console.banner("Testing Code Completion");
        if !self.server_ready().await
        {   return ScenarioResult::skipped();
        }

        let prompt = self.prompts.completion.clone();
        self.console.line(format!("Prompt:\n{}", prompt));
        self.announce_local_only();

        let request = CompletionRequest
        {   model: COMPLETION_MODEL.to_string()
          , prompt
          , temperature: TEMPERATURE
          , max_tokens: MAX_TOKENS
          , top_p: 1.0
          , frequency_penalty: 0.0
          , presence_penalty: 0.0
          , timeout_secs: CHAT_TIMEOUT_SECS
        };

        let start = Instant::now();
        let result = self.provider.send_completion(&request).await;
        let elapsed = start.elapsed().as_secs_f64();

        match result
        {   Ok(response) => {
              info!("Completion finished in {:.2}s", elapsed);
              self.report_completed(elapsed);
              self.console.line("Completion:");
              self.console.line(format!("{}{}", request.prompt, response.text));
              ScenarioResult::completed(response.text, elapsed)
            }
          , Err(e) => {
              self.report_failure(&e, false);
              ScenarioResult::failed(elapsed)
            }
        }
    }

    /// Streaming chat; Ctrl-C stops consumption early
    pub async fn run_streaming_chat(&mut self) -> ScenarioResult
    {   self.run_streaming_chat_until(ctrl_c()).await
    }

    /// Streaming chat, stopped early if `interrupt` resolves first
    pub async fn run_streaming_chat_until<F>(
      &mut self
    , interrupt: F
    ) -> ScenarioResult
    where
      F: Future<Output = ()>
    {   self.console.banner("Testing Streaming Chat");
        if !self.server_ready().await
        {   return ScenarioResult::skipped();
        }

        let prompt = self.prompts.streaming.clone();
        self.console.line(format!("Prompt: {}", prompt));
        self.announce_local_only();

        let request = ChatRequest
        {   model: CHAT_MODEL.to_string()
          , messages: vec![ChatMessage::user(prompt)]
          , temperature: TEMPERATURE
          , max_tokens: MAX_TOKENS
          , timeout_secs: STREAM_TIMEOUT_SECS
          , stream: true
        };

        let start = Instant::now();
        tokio::pin!(interrupt);
        let consumed = tokio::select!
        {   biased;
            _ = &mut interrupt => None
          , result = self.consume_stream(&request) => Some(result)
        };
        let elapsed = start.elapsed().as_secs_f64();

        match consumed
        {   None => {
              warn!("Streaming interrupted after {:.2}s", elapsed);
              self.console.blank();
              self.console.warning("Streaming interrupted by user.");
              ScenarioResult::interrupted(elapsed)
            }
          , Some(Ok((text, chunks))) => {
              info!("Stream of {} chunks finished in {:.2}s", chunks, elapsed);
              self.console.blank();
              self.console.blank();
              self.console.success(format!(
                "Streaming completed in {:.2} seconds", elapsed
              ));
              self.console.line(format!("   Received {} chunks", chunks));
              ScenarioResult::completed(text, elapsed).with_chunks(chunks)
            }
          , Some(Err(e)) => {
              self.report_failure(&e, true);
              ScenarioResult::failed(elapsed)
            }
        }
    }

    /// Drain the stream, echoing each fragment as it arrives.
    /// Every chunk counts, including ones without a fragment.
    async fn consume_stream(&mut self, request: &ChatRequest)
      -> Result<(String, usize)>
    {   let mut stream = self.provider.stream_chat(request).await?;
        self.console.blank();
        self.console.line("Streaming Response:");

        let mut full_content = String::new();
        let mut chunk_count = 0usize;

        while let Some(chunk) = stream.next().await
        {   let chunk = chunk?;
            chunk_count += 1;
            if let Some(fragment) = chunk.content.filter(|c| !c.is_empty())
            {   full_content.push_str(&fragment);
                self.console.fragment(&fragment);
            }
        }

        Ok((full_content, chunk_count))
    }

    /// Probe, re-run for every scenario
    async fn server_ready(&mut self) -> bool
    {   let report = self.prober.probe(&mut self.console).await;
        debug!("Probe report: {:?}", report);
        if !report.is_ready()
        {   self.console.line("Skipping test as server is not available.");
        }
        report.is_ready()
    }

    fn announce_local_only(&mut self)
    {   self.console.line(format!(
          "🔒 Connecting to local API at: {}",
          self.config.api_base()
        ));
        self.console.line("   No connection to OpenAI servers will be made.");
    }

    fn report_completed(&mut self, elapsed: f64)
    {   self.console.blank();
        self.console.success(format!(
          "Request completed in {:.2} seconds", elapsed
        ));
        self.console.blank();
    }

    fn report_failure(&mut self, err: &Error, after_stream: bool)
    {   if after_stream
        {   self.console.blank();
        }
        match err
        {   Error::ServiceUnavailable => {
              error!("Service unavailable");
              self.console.error(
                "Service unavailable. The server might be overloaded."
              );
            }
          , Error::Timeout => {
              error!("Request timed out");
              self.console.error(
                "Request timed out. The server took too long to respond."
              );
            }
          , Error::BadRequest(detail) => {
              error!("Bad request: {}", detail);
              self.console.error(format!("Bad request - {}", detail));
            }
          , Error::Other(detail) => {
              error!("Unexpected error: {}", detail);
              self.console.error(detail);
            }
        }
    }
}

#[async_trait(?Send)]
impl<P: Provider, W: Write> Scenarios for Harness<P, W>
{   async fn run_scenario(&mut self, scenario: Scenario)
      -> ScenarioResult
    {   debug!("Running scenario: {}", scenario.name());
        match scenario
        {   Scenario::Chat => self.run_chat().await
          , Scenario::Completion => self.run_completion().await
          , Scenario::Streaming => self.run_streaming_chat().await
        }
    }
}

/// Resolves on Ctrl-C; never resolves if the handler cannot be installed.
/// Once installed the SIGINT handler stays for the rest of the process, so
/// Ctrl-C no longer kills it; streaming is kept last in `Scenario::ALL`.
async fn ctrl_c()
{   if let Err(e) = tokio::signal::ctrl_c().await
    {   warn!("Cannot listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
