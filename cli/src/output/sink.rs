//! Output sinks for remote command streams.
//!
//! A single target streams straight through. With several targets every
//! complete line is framed with the instance it came from, and each framed
//! batch is written with one `write_all` so lines from different instances
//! never interleave mid-line.

use std::io::{self, Write};

use crate::application::ExecSinks;

/// Writer that prefixes every line passed through it.
///
/// An unterminated trailing line is held back until more bytes arrive or the
/// writer is dropped, at which point it is emitted with a newline.
pub struct LinePrefixWriter<W: Write> {
    prefix: String,
    inner: W,
    partial: Vec<u8>,
}

impl<W: Write> LinePrefixWriter<W> {
    #[must_use]
    pub fn new(prefix: impl Into<String>, inner: W) -> Self {
        Self {
            prefix: prefix.into(),
            inner,
            partial: Vec::new(),
        }
    }

    fn frame(&self, line: &[u8], out: &mut Vec<u8>) {
        out.extend_from_slice(self.prefix.as_bytes());
        out.extend_from_slice(line);
    }
}

impl<W: Write> Write for LinePrefixWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.partial.extend_from_slice(buf);
        let Some(last_newline) = self.partial.iter().rposition(|&b| b == b'\n') else {
            return Ok(buf.len());
        };
        let rest = self.partial.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.partial, rest);

        let mut out = Vec::with_capacity(complete.len() + self.prefix.len() * 4);
        for line in complete.split_inclusive(|&b| b == b'\n') {
            self.frame(line, &mut out);
        }
        self.inner.write_all(&out)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl<W: Write> Drop for LinePrefixWriter<W> {
    fn drop(&mut self) {
        if self.partial.is_empty() {
            return;
        }
        let line = std::mem::take(&mut self.partial);
        let mut out = Vec::with_capacity(line.len() + self.prefix.len() + 1);
        self.frame(&line, &mut out);
        out.push(b'\n');
        let _ = self.inner.write_all(&out);
        let _ = self.inner.flush();
    }
}

/// Sinks for one target's run: the process's stdout and stderr, each
/// optionally framed with `prefix` on every line.
///
/// With `stdout_on_stderr` remote stdout is sent to the process's stderr,
/// keeping stdout free for a machine-readable document.
#[must_use]
pub fn exec_sinks(prefix: Option<&str>, stdout_on_stderr: bool) -> ExecSinks {
    let stdout: Box<dyn Write + Send> = match (prefix, stdout_on_stderr) {
        (None, false) => return ExecSinks::process(),
        (None, true) => Box::new(io::stderr()),
        (Some(p), false) => Box::new(LinePrefixWriter::new(p, io::stdout())),
        (Some(p), true) => Box::new(LinePrefixWriter::new(p, io::stderr())),
    };
    let stderr: Box<dyn Write + Send> = match prefix {
        None => Box::new(io::stderr()),
        Some(p) => Box::new(LinePrefixWriter::new(p, io::stderr())),
    };
    ExecSinks { stdout, stderr }
}
