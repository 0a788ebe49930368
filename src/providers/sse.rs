//! Incremental server-sent events parser for streamed completions
//!
//! Bytes arrive in arbitrary network-sized pieces; a `data:` line
//! may be split across reads, so lines are buffered until `\n`.

/// One complete SSE event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent
{   pub event_type: Option<String>
  , /// `data:` lines joined with `\n`
    pub data: String
}

impl SseEvent
{   /// OpenAI-compatible servers end a stream with `data: [DONE]`
    pub fn is_done(&self) -> bool
    {   self.data.trim() == "[DONE]"
    }
}

#[derive(Debug, Default)]
pub struct SseLineParser
{   line_buffer: Vec<u8>
  , event_type: Option<String>
  , data_lines: Vec<String>
}

impl SseLineParser
{   pub fn new() -> Self
    {   Self::default()
    }

    /// Feed raw bytes, returning every event completed by them
    pub fn push(&mut self, bytes: &[u8]) -> Vec<SseEvent>
    {   let mut events = Vec::new();
        for &b in bytes
        {   if b == b'\n'
            {   let raw = std::mem::take(&mut self.line_buffer);
                let line = String::from_utf8_lossy(&raw);
                let line = line.strip_suffix('\r').unwrap_or(&line);
                if let Some(event) = self.process_line(line)
                {   events.push(event);
                }
            } else
            {   self.line_buffer.push(b);
            }
        }
        events
    }

    /// Emit whatever is pending once the body has ended
    pub fn flush(&mut self) -> Option<SseEvent>
    {   if !self.line_buffer.is_empty()
        {   let raw = std::mem::take(&mut self.line_buffer);
            let line = String::from_utf8_lossy(&raw).into_owned();
            self.process_line(line.trim_end_matches('\r'));
        }
        self.take_event()
    }

    fn process_line(&mut self, line: &str) -> Option<SseEvent>
    {   if line.is_empty()
        {   return self.take_event();
        }
        if line.starts_with(':')
        {   return None;
        }
        let (field, value) = match line.split_once(':')
        {   Some((f, v)) => (f, v.strip_prefix(' ').unwrap_or(v))
          , None => (line, "")
        };
        match field
        {   "data" => self.data_lines.push(value.to_string())
          , "event" => self.event_type = Some(value.to_string())
          , _ => {}
        }
        None
    }

    fn take_event(&mut self) -> Option<SseEvent>
    {   if self.data_lines.is_empty()
        {   self.event_type = None;
            return None;
        }
        Some(SseEvent
        {   event_type: self.event_type.take()
          , data: std::mem::take(&mut self.data_lines).join("\n")
        })
    }
}
