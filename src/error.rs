use std::fmt;
use log::debug;

/// Classified failure of a provider call
/// Implements Clone + Eq so results can be matched in tests
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error
{   /// Server reported it cannot serve the request right now
    ServiceUnavailable
  , /// Transport or server-side request timeout
    Timeout
  , /// Server rejected the request, with its detail message
    BadRequest(String)
  , /// Anything else
    Other(String)
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error
{   /// Classify a non-success HTTP response
    pub fn from_status(
      status: reqwest::StatusCode
    , body: &str
    ) -> Self
    {   let detail = extract_error_message(body);
        debug!("Classifying HTTP {}: {}", status.as_u16(), detail);
        match status.as_u16()
        {   503 => Error::ServiceUnavailable
          , 408 | 504 => Error::Timeout
          , 400 | 422 => Error::BadRequest(detail)
          , code => Error::Other(
              format!("HTTP {}: {}", code, detail)
            )
        }
    }

    /// Classify a failure raised by the HTTP client itself
    pub fn from_transport(err: reqwest::Error) -> Self
    {   if err.is_timeout()
        {   Error::Timeout
        } else
        {   Error::Other(err.to_string())
        }
    }
}

/// Pull `error.message` out of an OpenAI-style error body,
/// falling back to the raw body
fn extract_error_message(body: &str) -> String
{   serde_json::from_str::<serde_json::Value>(body)
      .ok()
      .and_then(|v| {
        v.get("error")
          .and_then(|e| e.get("message"))
          .and_then(|m| m.as_str())
          .map(String::from)
      })
      .unwrap_or_else(|| body.trim().to_string())
}

impl fmt::Display for Error
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   Error::ServiceUnavailable => {
              write!(f, "Service unavailable")
            }
          , Error::Timeout => {
              write!(f, "Request timed out")
            }
          , Error::BadRequest(msg) => {
              write!(f, "Bad request: {}", msg)
            }
          , Error::Other(msg) => {
              write!(f, "{}", msg)
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<String> for Error
{   fn from(s: String) -> Self
    {   Error::Other(s)
    }
}

impl From<&str> for Error
{   fn from(s: &str) -> Self
    {   Error::Other(s.to_string())
    }
}
