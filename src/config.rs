//! Endpoint configuration for the local server under test

use serde::{Deserialize, Serialize};

/// Root of the local OpenAI-compatible server
pub const DEFAULT_SERVER_URL: &str
  = "http://localhost:8888";

/// Credential sent to the local server; never a real key
pub const PLACEHOLDER_API_KEY: &str
  = "dummy-key-for-local-only";

/// Variable pinned to the placeholder so no real provider is reachable
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Body substring the server emits before interactive auth is done
pub const AUTH_FAILURE_MARKER: &str = "Not authenticated";

pub const PROBE_TIMEOUT_SECS: u64 = 5;
pub const CHAT_TIMEOUT_SECS: u64 = 30;
pub const STREAM_TIMEOUT_SECS: u64 = 60;

/// Where and how to reach the server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig
{   /// Server root, probed with a plain GET
    pub server_url: String
  , /// Bearer credential for API calls
    pub api_key: String
  , /// Availability probe timeout in seconds
    pub probe_timeout_secs: u64
}

impl EndpointConfig
{   pub fn with_server_url(
      mut self
    , server_url: impl Into<String>
    ) -> Self
    {   self.server_url = server_url.into();
        self
    }

    pub fn with_probe_timeout_secs(mut self, secs: u64) -> Self
    {   self.probe_timeout_secs = secs;
        self
    }

    fn root(&self) -> &str
    {   self.server_url.trim_end_matches('/')
    }

    /// Base path of the OpenAI-compatible API
    pub fn api_base(&self) -> String
    {   format!("{}/v1", self.root())
    }

    /// Page where the user completes the server's interactive auth
    pub fn auth_url(&self) -> String
    {   format!("{}/auth", self.root())
    }
}

impl Default for EndpointConfig
{   fn default() -> Self
    {   EndpointConfig
        {   server_url: DEFAULT_SERVER_URL.to_string()
          , api_key: PLACEHOLDER_API_KEY.to_string()
          , probe_timeout_secs: PROBE_TIMEOUT_SECS
        }
    }
}
