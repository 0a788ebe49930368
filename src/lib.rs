pub mod error;
pub mod config;
pub mod console;
pub mod providers;
pub mod request;
pub mod probe;
pub mod runner;
pub mod selector;

/*

allm-smoke: smoke tests for a local OpenAI-compatible server
(e.g. a Copilot API bridge on localhost:8888).

allm-smoke/
├── src/
│   ├── lib.rs          # Scenario / ScenarioResult
│   ├── main.rs         # CLI entry point
│   ├── error.rs        # Classified provider errors
│   ├── config.rs       # Endpoint configuration and constants
│   ├── console.rs      # Operator-facing output
│   ├── request.rs      # Chat / completion / chunk types
│   ├── probe.rs        # Availability prober
│   ├── runner.rs       # Chat, completion and streaming runners
│   ├── selector.rs     # Scenario selection from argv
│   └── providers/
│       ├── mod.rs      # Provider trait
│       ├── openai.rs   # reqwest-backed OpenAI-compatible client
│       └── sse.rs      # Server-sent events parser
└── tests/

*/

pub use config::EndpointConfig;
pub use error::{Error, Result};
pub use providers::{ChunkStream, OpenAiCompatClient, Provider};
pub use runner::{Harness, Scenarios};
pub use selector::Selection;

/// One of the three request/response exercises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scenario
{   /// Multi-turn chat completion
    Chat
  , /// Legacy single-prompt completion (`code` on the command line)
    Completion
  , /// Incrementally delivered chat completion
    Streaming
}

impl Scenario
{   /// Run order when no scenario is named
    pub const ALL: [Scenario; 3] = [
      Scenario::Chat
    , Scenario::Completion
    , Scenario::Streaming
    ];

    /// Command-line name
    pub fn name(&self) -> &'static str
    {   match self
        {   Scenario::Chat => "chat"
          , Scenario::Completion => "code"
          , Scenario::Streaming => "stream"
        }
    }

    /// Case-insensitive lookup by command-line name
    pub fn from_name(name: &str) -> Option<Scenario>
    {   let name = name.to_lowercase();
        Scenario::ALL.into_iter().find(|s| s.name() == name)
    }
}

/// Outcome of one scenario
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioResult
{   pub succeeded: bool
  , /// Reply text; `None` when skipped, failed or interrupted
    pub output: Option<String>
  , pub elapsed_secs: f64
  , /// Chunks received, streaming only
    pub chunks: Option<usize>
  , /// Operator stopped the stream
    pub interrupted: bool
}

impl ScenarioResult
{   /// Probe said the server is not ready; nothing was sent
    pub fn skipped() -> Self
    {   ScenarioResult
        {   succeeded: false
          , output: None
          , elapsed_secs: 0.0
          , chunks: None
          , interrupted: false
        }
    }

    pub fn failed(elapsed_secs: f64) -> Self
    {   ScenarioResult { elapsed_secs, ..Self::skipped() }
    }

    pub fn completed(output: String, elapsed_secs: f64) -> Self
    {   ScenarioResult
        {   succeeded: true
          , output: Some(output)
          , elapsed_secs
          , chunks: None
          , interrupted: false
        }
    }

    pub fn with_chunks(mut self, chunks: usize) -> Self
    {   self.chunks = Some(chunks);
        self
    }

    /// Clean early stop; partial output is discarded
    pub fn interrupted(elapsed_secs: f64) -> Self
    {   ScenarioResult
        {   interrupted: true
          , ..Self::failed(elapsed_secs)
        }
    }
}
