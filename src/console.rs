//! Human-readable console output
//!
//! Console text is for the operator only; write failures are dropped.

use std::io::{self, Write};

pub const WIDTH: usize = 70;

pub struct Console<W: Write>
{   out: W
}

impl Console<io::Stdout>
{   pub fn stdout() -> Self
    {   Console::new(io::stdout())
    }
}

impl<W: Write> Console<W>
{   pub fn new(out: W) -> Self
    {   Console { out }
    }

    pub fn into_inner(self) -> W
    {   self.out
    }

    pub fn line(&mut self, text: impl AsRef<str>)
    {   let _ = writeln!(self.out, "{}", text.as_ref());
    }

    pub fn blank(&mut self)
    {   let _ = writeln!(self.out);
    }

    /// Print without a line break and flush, for incremental display
    pub fn fragment(&mut self, text: &str)
    {   let _ = write!(self.out, "{}", text);
        let _ = self.out.flush();
    }

    pub fn success(&mut self, text: impl AsRef<str>)
    {   self.line(format!("✅ {}", text.as_ref()));
    }

    pub fn error(&mut self, text: impl AsRef<str>)
    {   self.line(format!("❌ Error: {}", text.as_ref()));
    }

    pub fn warning(&mut self, text: impl AsRef<str>)
    {   self.line(format!("⚠️ {}", text.as_ref()));
    }

    pub fn rule(&mut self, ch: char)
    {   self.line(ch.to_string().repeat(WIDTH));
    }

    pub fn centered(&mut self, text: &str)
    {   self.line(format!("{:^width$}", text, width = WIDTH));
    }

    /// `=== title ===` section header surrounded by blank lines
    pub fn banner(&mut self, title: &str)
    {   self.blank();
        self.line(format!("=== {} ===", title));
        self.blank();
    }
}
