//! Incremental decoder for `text/event-stream` bodies.
//!
//! Bytes arrive in arbitrary chunks; complete lines are decoded as they
//! become available and each blank line dispatches one frame. Lines end in
//! `\n` or `\r\n`; bare `\r` terminators are not supported.

use bytes::BytesMut;

const DEFAULT_EVENT: &str = "message";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseFrame {
    pub event: String,
    pub data: String,
    pub id: Option<String>,
}

#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: BytesMut,
    event: Option<String>,
    data: String,
    has_data: bool,
    last_id: Option<String>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one chunk and returns every frame it completed.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        self.buffer.extend_from_slice(chunk);
        let mut frames = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let raw = self.buffer.split_to(pos + 1);
            let mut line: &[u8] = &raw[..pos];
            if let Some(stripped) = line.strip_suffix(b"\r") {
                line = stripped;
            }
            let line = String::from_utf8_lossy(line);
            if let Some(frame) = self.process_line(&line) {
                frames.push(frame);
            }
        }
        frames
    }

    /// Bytes buffered after the last complete line. An unterminated event
    /// at end of stream is discarded.
    pub fn pending_bytes(&self) -> usize {
        self.buffer.len()
    }

    fn process_line(&mut self, line: &str) -> Option<SseFrame> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }
        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => {
                if self.has_data {
                    self.data.push('\n');
                }
                self.data.push_str(value);
                self.has_data = true;
            }
            "id" if !value.contains('\0') => self.last_id = Some(value.to_string()),
            // `retry` only matters for reconnecting clients.
            _ => {}
        }
        None
    }

    fn dispatch(&mut self) -> Option<SseFrame> {
        let event = self.event.take();
        if !self.has_data {
            self.data.clear();
            return None;
        }
        self.has_data = false;
        Some(SseFrame {
            event: event
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| DEFAULT_EVENT.to_string()),
            data: std::mem::take(&mut self.data),
            id: self.last_id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{SseDecoder, SseFrame};

    fn frame(event: &str, data: &str) -> SseFrame {
        SseFrame {
            event: event.to_string(),
            data: data.to_string(),
            id: None,
        }
    }

    #[test]
    fn decodes_named_events_with_crlf_terminators() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.feed(
            b"event: state_result\r\ndata: {\"state_code\":\"DE\"}\r\n\r\nevent: done\r\ndata: {\"status\":\"complete\"}\r\n\r\n",
        );
        assert_eq!(
            frames,
            vec![
                frame("state_result", "{\"state_code\":\"DE\"}"),
                frame("done", "{\"status\":\"complete\"}"),
            ]
        );
        assert_eq!(decoder.pending_bytes(), 0);
    }

    #[test]
    fn frames_split_across_chunks_are_reassembled() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(b"event: uspto_res").is_empty());
        assert!(decoder.feed(b"ult\ndata: {\"risk").is_empty());
        let frames = decoder.feed(b"_level\":\"low\"}\n\n");
        assert_eq!(frames, vec![frame("uspto_result", "{\"risk_level\":\"low\"}")]);
    }

    #[test]
    fn multibyte_characters_split_across_chunks_survive() {
        let mut decoder = SseDecoder::new();
        let text = "data: Caf\u{e9}\n\n".as_bytes();
        let split = text.iter().position(|b| *b == 0xC3).unwrap() + 1;
        assert!(decoder.feed(&text[..split]).is_empty());
        let frames = decoder.feed(&text[split..]);
        assert_eq!(frames, vec![frame("message", "Caf\u{e9}")]);
    }

    #[test]
    fn comments_and_empty_events_are_skipped() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.feed(b": ping - 2026-01-01\n\nevent: done\n\nretry: 1500\ndata: a\ndata: b\n\n");
        assert_eq!(frames, vec![frame("message", "a\nb")]);
    }

    #[test]
    fn last_event_id_is_carried_forward() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.feed(b"id: 7\ndata: x\n\ndata: y\n\n");
        assert_eq!(frames[0].id.as_deref(), Some("7"));
        assert_eq!(frames[1].id.as_deref(), Some("7"));
    }

    #[test]
    fn unterminated_event_stays_buffered() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(b"event: done\ndata: {}").is_empty());
        assert_eq!(decoder.pending_bytes(), "data: {}".len());
    }
}
