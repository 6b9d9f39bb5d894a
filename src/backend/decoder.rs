// src/backend/decoder.rs — NDJSON stream decoding with code-fence buffering

use futures::StreamExt;
use tracing::warn;

use super::StreamFormat;
use crate::core::events::{EventSink, Phase, RunEvent};

const FENCE: &str = "```";

/// Decoder for one streaming backend response. One decoder per response;
/// not restartable.
///
/// Content outside a code fence is emitted as it arrives. Fenced content
/// is buffered until the fence closes, then normalized (fence markers and
/// language tag stripped, bare snippets wrapped as a named function) and
/// emitted as a single fragment.
pub struct StreamDecoder {
    format: StreamFormat,
    in_fence: bool,
    fence_buf: String,
    /// Trailing partial backtick run held back so a fence delimiter split
    /// across transport chunks still toggles exactly once.
    carry: String,
}

impl StreamDecoder {
    pub fn new(format: StreamFormat) -> Self {
        Self {
            format,
            in_fence: false,
            fence_buf: String::new(),
            carry: String::new(),
        }
    }

    /// Decode one NDJSON line into fragments. Malformed lines are logged
    /// and skipped; a single bad event never aborts the decode.
    pub fn feed_line(&mut self, line: &str) -> Vec<String> {
        let line = line.trim();
        if line.is_empty() {
            return Vec::new();
        }

        let parsed: serde_json::Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(e) => {
                warn!("Skipping malformed stream event: {}", e);
                return Vec::new();
            }
        };

        let content = match self.format {
            StreamFormat::Chat => parsed["message"]["content"].as_str().unwrap_or(""),
            StreamFormat::Generate => parsed["response"].as_str().unwrap_or(""),
        };
        if content.is_empty() {
            return Vec::new();
        }
        self.feed_content(content)
    }

    fn feed_content(&mut self, content: &str) -> Vec<String> {
        let mut pending = std::mem::take(&mut self.carry);
        pending.push_str(content);

        let mut out = Vec::new();
        loop {
            match pending.find(FENCE) {
                Some(pos) => {
                    let before = &pending[..pos];
                    if self.in_fence {
                        self.fence_buf.push_str(before);
                        if let Some(block) = normalize_block(&self.fence_buf) {
                            out.push(block);
                        }
                        self.fence_buf.clear();
                    } else if !before.is_empty() {
                        out.push(before.to_string());
                    }
                    self.in_fence = !self.in_fence;
                    pending = pending[pos + FENCE.len()..].to_string();
                }
                None => {
                    let hold = trailing_backticks(&pending).min(FENCE.len() - 1);
                    let split = pending.len() - hold;
                    let emit = &pending[..split];
                    if self.in_fence {
                        self.fence_buf.push_str(emit);
                    } else if !emit.is_empty() {
                        out.push(emit.to_string());
                    }
                    self.carry = pending[split..].to_string();
                    break;
                }
            }
        }
        out
    }

    /// Flush at end of stream. An unterminated fence is emitted as a
    /// normalized block so its content is not lost.
    pub fn finish(&mut self) -> Vec<String> {
        let mut out = Vec::new();
        let carry = std::mem::take(&mut self.carry);
        if self.in_fence {
            self.fence_buf.push_str(&carry);
            if let Some(block) = normalize_block(&self.fence_buf) {
                out.push(block);
            }
            self.fence_buf.clear();
            self.in_fence = false;
        } else if !carry.is_empty() {
            out.push(carry);
        }
        out
    }
}

/// Strip the language tag from a fenced block and wrap snippets that carry
/// no code markers as a minimal named function. Empty blocks produce
/// nothing.
fn normalize_block(block: &str) -> Option<String> {
    let body = match block.split_once('\n') {
        Some((first, rest)) if is_language_tag(first) => rest,
        _ => block,
    };
    let code = body.trim();
    if code.is_empty() {
        return None;
    }
    if code.contains("function") || code.contains("=>") {
        Some(code.to_string())
    } else {
        Some(format!("function example() {{ {} }}", code))
    }
}

fn is_language_tag(line: &str) -> bool {
    let tag = line.trim();
    !tag.is_empty()
        && tag.len() <= 20
        && tag
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '#' | '-' | '_'))
}

fn trailing_backticks(s: &str) -> usize {
    s.bytes().rev().take_while(|&b| b == b'`').count()
}

/// Drive a streaming response through a decoder, forwarding every fragment
/// to the sink as it is produced, and return the concatenation of all
/// emitted fragments.
///
/// Transport events arrive as NDJSON lines; a trailing unterminated line
/// (the whole body, for a non-streaming response) is decoded at end of
/// stream.
pub async fn collect_stream(
    response: reqwest::Response,
    format: StreamFormat,
    sink: &EventSink,
    phase: Phase,
) -> String {
    let mut decoder = StreamDecoder::new(format);
    let mut byte_stream = response.bytes_stream();
    let mut buffer = String::new();
    let mut full = String::new();

    let forward = |fragments: Vec<String>, full: &mut String| {
        for fragment in fragments {
            full.push_str(&fragment);
            sink.emit(RunEvent::Fragment {
                phase,
                content: fragment,
            });
        }
    };

    while let Some(chunk) = byte_stream.next().await {
        let bytes = match chunk {
            Ok(b) => b,
            Err(e) => {
                warn!("Stream read error, ending decode: {}", e);
                break;
            }
        };
        buffer.push_str(&String::from_utf8_lossy(&bytes));

        while let Some(newline) = buffer.find('\n') {
            let line: String = buffer.drain(..=newline).collect();
            forward(decoder.feed_line(&line), &mut full);
        }
    }

    if !buffer.trim().is_empty() {
        forward(decoder.feed_line(&buffer), &mut full);
    }
    forward(decoder.finish(), &mut full);
    full
}
