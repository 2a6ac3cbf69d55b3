//! Assembly of newline-delimited JSON streams.
//!
//! The self-hosted generate API streams one JSON object per line:
//!
//! ```text
//! {"response":"A","done":false}
//! {"response":"B","done":false}
//! {"response":"C","done":true}
//! ```
//!
//! Partial texts are concatenated in arrival order. The stream is complete
//! only once a fragment with `"done": true` has been seen.

use docent_models::{LlmError, ProviderIdentity};
use serde::Deserialize;
use serde_json::Value;

/// One streamed fragment.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Fragment {
    response: Option<String>,
    done: bool,
    error: Option<Value>,
}

/// Incrementally assembles a line-delimited JSON stream into one answer.
///
/// Bytes may be pushed in arbitrary chunks; lines split across chunks (and
/// UTF-8 sequences split across chunks) are buffered until complete.
#[derive(Debug)]
pub struct LineDelimitedAssembler {
    provider: ProviderIdentity,
    buffer: Vec<u8>,
    text: String,
    done: bool,
    last_error: Option<String>,
}

impl LineDelimitedAssembler {
    /// Creates an empty assembler.
    #[must_use]
    pub fn new(provider: ProviderIdentity) -> Self {
        Self {
            provider,
            buffer: Vec::new(),
            text: String::new(),
            done: false,
            last_error: None,
        }
    }

    /// Feeds a chunk of bytes.
    ///
    /// # Errors
    ///
    /// Fails if a complete line is not valid JSON, or if a terminal fragment
    /// carries an error, regardless of text produced so far.
    pub fn push(&mut self, chunk: &[u8]) -> Result<(), LlmError> {
        self.buffer.extend_from_slice(chunk);
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            self.process_line(&line)?;
        }
        Ok(())
    }

    /// Flushes any trailing line and returns the assembled text.
    ///
    /// # Errors
    ///
    /// Fails with "stream did not complete" if no terminal fragment was seen.
    pub fn finish(mut self) -> Result<String, LlmError> {
        let rest = core::mem::take(&mut self.buffer);
        self.process_line(&rest)?;

        if !self.done {
            let message = match &self.last_error {
                Some(error) => format!("stream did not complete: {error}"),
                None => "stream did not complete".to_string(),
            };
            return Err(LlmError::api(self.provider, message));
        }
        Ok(self.text)
    }

    fn process_line(&mut self, line: &[u8]) -> Result<(), LlmError> {
        let line = core::str::from_utf8(line).map_err(|err| {
            LlmError::api(self.provider, format!("stream fragment was not valid UTF-8: {err}"))
        })?;
        let line = line.trim();
        if line.is_empty() {
            return Ok(());
        }

        let fragment: Fragment = serde_json::from_str(line).map_err(|err| {
            LlmError::api(
                self.provider,
                format!("stream fragment was not valid JSON: {err}"),
            )
            .with_body(line)
        })?;

        if let Some(text) = fragment.response {
            self.text.push_str(&text);
        }

        let error = fragment.error.filter(|e| !e.is_null()).map(|e| match e {
            Value::String(s) => s,
            other => other.to_string(),
        });

        if fragment.done {
            if let Some(error) = error {
                tracing::error!(provider = %self.provider, %error, "stream reported an error");
                return Err(LlmError::api(
                    self.provider,
                    format!("stream reported an error: {error}"),
                ));
            }
            self.done = true;
        } else if error.is_some() {
            self.last_error = error;
        }
        Ok(())
    }
}

/// Assembles a complete line-delimited stream from already received chunks.
///
/// # Errors
///
/// See [`LineDelimitedAssembler::push`] and [`LineDelimitedAssembler::finish`].
pub fn assemble_line_delimited<I, C>(provider: ProviderIdentity, chunks: I) -> Result<String, LlmError>
where
    I: IntoIterator<Item = C>,
    C: AsRef<[u8]>,
{
    let mut assembler = LineDelimitedAssembler::new(provider);
    for chunk in chunks {
        assembler.push(chunk.as_ref())?;
    }
    assembler.finish()
}
