//! Pre-flight reachability / authentication check, run before every scenario

use std::io::Write;
use std::time::Duration;
use log::{info, warn, error};
use crate::config::{EndpointConfig, AUTH_FAILURE_MARKER};
use crate::console::Console;

const BODY_PREVIEW_CHARS: usize = 100;

/// Why the server could not be reached
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectFailure
{   Refused
  , TimedOut
  , Unexpected(String)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeReport
{   /// HTTP 200 and no auth failure marker
    Ready
  , /// Server answered but the interactive auth flow is not done
    Unauthenticated
  , /// Server answered with a non-200 status
    NotReady { status: u16 }
  , Unreachable(ConnectFailure)
}

impl ProbeReport
{   pub fn reachable(&self) -> bool
    {   matches!(self, ProbeReport::Ready | ProbeReport::Unauthenticated)
    }

    pub fn authenticated(&self) -> bool
    {   matches!(self, ProbeReport::Ready)
    }

    pub fn is_ready(&self) -> bool
    {   self.reachable() && self.authenticated()
    }
}

pub struct AvailabilityProber
{   server_url: String
  , auth_url: String
  , timeout: Duration
  , http_client: reqwest::Client
}

impl AvailabilityProber
{   pub fn new(config: &EndpointConfig) -> Self
    {   AvailabilityProber
        {   server_url: config.server_url.clone()
          , auth_url: config.auth_url()
          , timeout: Duration::from_secs(config.probe_timeout_secs)
          , http_client: reqwest::Client::new()
        }
    }

    /// GET the server root and classify the answer
    pub async fn probe<W: Write>(
      &self
    , console: &mut Console<W>
    ) -> ProbeReport
    {   info!("Checking server availability at {}", self.server_url);

        let response = match self.http_client
          .get(&self.server_url)
          .timeout(self.timeout)
          .send()
          .await
        {   Ok(response) => response
          , Err(e) => {
              let failure = classify_transport(&e);
              self.report_unreachable(&failure, console);
              return ProbeReport::Unreachable(failure);
            }
        };

        let status = response.status().as_u16();
        let body = match response.text().await
        {   Ok(body) => body
          , Err(e) => {
              let failure = classify_transport(&e);
              self.report_unreachable(&failure, console);
              return ProbeReport::Unreachable(failure);
            }
        };
        info!("Server status: {}", status);
        info!("Server response: {}...", preview(&body));

        if body.contains(AUTH_FAILURE_MARKER)
        {   warn!("Server requires authentication");
            console.warning(
              "Server requires authentication. Please authenticate first."
            );
            console.line(format!(
              "  Visit {} in your browser to authenticate.",
              self.auth_url
            ));
            return ProbeReport::Unauthenticated;
        }

        if status == 200
        {   ProbeReport::Ready
        } else
        {   warn!("Server answered with status {}", status);
            ProbeReport::NotReady { status }
        }
    }

    fn report_unreachable<W: Write>(
      &self
    , failure: &ConnectFailure
    , console: &mut Console<W>
    )
    {   match failure
        {   ConnectFailure::Refused => {
              error!("Could not connect to the local server");
              console.error(format!(
                "Could not connect to the local server at {}",
                self.server_url
              ));
              console.line(
                "   Make sure your Copilot API server is running."
              );
            }
          , ConnectFailure::TimedOut => {
              error!("Connection to server timed out");
              console.error("Connection to server timed out");
              console.line(
                "   The server might be overloaded or not responding."
              );
            }
          , ConnectFailure::Unexpected(msg) => {
              error!("Unexpected error checking server: {}", msg);
              console.error(msg);
            }
        }
    }
}

fn classify_transport(err: &reqwest::Error) -> ConnectFailure
{   if err.is_timeout()
    {   ConnectFailure::TimedOut
    } else if err.is_connect()
    {   ConnectFailure::Refused
    } else
    {   ConnectFailure::Unexpected(err.to_string())
    }
}

fn preview(body: &str) -> &str
{   match body.char_indices().nth(BODY_PREVIEW_CHARS)
    {   Some((idx, _)) => &body[..idx]
      , None => body
    }
}
