/// Incremental UTF-8 decoding for streamed response bodies.
///
/// Network chunks can end in the middle of a multi-byte character. The
/// decoder holds such a tail back until the rest of it arrives, the same way
/// the SSE parser holds back incomplete lines.
use futures::stream::{self, BoxStream};
use futures::StreamExt;

use crate::api::ByteStream;
use crate::error::Result;

const REPLACEMENT: char = '\u{FFFD}';

/// Stateful decoder that buffers incomplete sequences across calls.
#[derive(Debug, Default)]
pub struct Utf8StreamDecoder {
    pending: Vec<u8>,
}

impl Utf8StreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes. Returns everything decodable so far; invalid
    /// sequences become U+FFFD.
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        self.pending.extend_from_slice(chunk);

        let mut out = String::new();
        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(text) => {
                    out.push_str(text);
                    self.pending.clear();
                    break;
                }
                Err(e) => {
                    let valid = e.valid_up_to();
                    out.push_str(&String::from_utf8_lossy(&self.pending[..valid]));
                    match e.error_len() {
                        // Incomplete sequence at the end: wait for more bytes
                        None => {
                            self.pending.drain(..valid);
                            break;
                        }
                        Some(bad) => {
                            out.push(REPLACEMENT);
                            self.pending.drain(..valid + bad);
                        }
                    }
                }
            }
        }
        out
    }

    /// Flush at end of stream. A dangling partial character becomes U+FFFD.
    pub fn finish(&mut self) -> String {
        if self.pending.is_empty() {
            String::new()
        } else {
            self.pending.clear();
            REPLACEMENT.to_string()
        }
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

/// Turn a byte stream into a lazy stream of decoded, non-empty text
/// fragments. Ends after the body ends or after the first error.
pub fn decode_text_stream(body: ByteStream) -> BoxStream<'static, Result<String>> {
    stream::unfold(Some((body, Utf8StreamDecoder::new())), |state| async move {
        let Some((mut body, mut decoder)) = state else {
            return None;
        };
        loop {
            match body.next().await {
                Some(Ok(bytes)) => {
                    let text = decoder.decode(&bytes);
                    if !text.is_empty() {
                        return Some((Ok(text), Some((body, decoder))));
                    }
                }
                Some(Err(e)) => return Some((Err(e), None)),
                None => {
                    let tail = decoder.finish();
                    return if tail.is_empty() {
                        None
                    } else {
                        Some((Ok(tail), None))
                    };
                }
            }
        }
    })
    .boxed()
}
