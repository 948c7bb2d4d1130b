//! Line codec for the foreign protocol.
//!
//! Unlike `LinesCodec`, nothing the remote sends is a decode error: bad
//! UTF-8 is replaced and an over-long line is skipped up to its newline and
//! reported as [`RawLine::Overlong`]. Only I/O failures end the stream.

use std::io;

use bytes::{BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

/// One inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawLine {
    /// A line without its terminator.
    Text(String),
    /// A line longer than the limit, by its discarded length in bytes.
    Overlong(usize),
}

pub struct ForeignLineCodec {
    /// Index of next byte to check for newline
    next_index: usize,
    max_len: usize,
    /// Bytes dropped so far from an over-long line.
    discarding: Option<usize>,
}

impl ForeignLineCodec {
    pub fn new(max_len: usize) -> Self {
        Self {
            next_index: 0,
            max_len,
            discarding: None,
        }
    }
}

fn text(line: &[u8]) -> String {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line).into_owned()
}

impl Decoder for ForeignLineCodec {
    type Item = RawLine;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> io::Result<Option<RawLine>> {
        let newline = src[self.next_index..]
            .iter()
            .position(|b| *b == b'\n')
            .map(|offset| self.next_index + offset);

        if let Some(dropped) = self.discarding {
            return Ok(match newline {
                Some(end) => {
                    let _ = src.split_to(end + 1);
                    self.next_index = 0;
                    self.discarding = None;
                    Some(RawLine::Overlong(dropped + end + 1))
                }
                None => {
                    self.discarding = Some(dropped + src.len());
                    src.clear();
                    self.next_index = 0;
                    None
                }
            });
        }

        match newline {
            Some(end) => {
                let line = src.split_to(end + 1);
                self.next_index = 0;
                let body = &line[..end];
                if body.strip_suffix(b"\r").unwrap_or(body).len() > self.max_len {
                    return Ok(Some(RawLine::Overlong(line.len())));
                }
                Ok(Some(RawLine::Text(text(body))))
            }
            // A pending '\r' may still belong to the terminator.
            None if src.len() > self.max_len + 1 => {
                self.discarding = Some(src.len());
                src.clear();
                self.next_index = 0;
                Ok(None)
            }
            None => {
                self.next_index = src.len();
                Ok(None)
            }
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> io::Result<Option<RawLine>> {
        if let Some(line) = self.decode(src)? {
            return Ok(Some(line));
        }
        self.next_index = 0;
        if let Some(dropped) = self.discarding.take() {
            return Ok(Some(RawLine::Overlong(dropped)));
        }
        if src.is_empty() {
            return Ok(None);
        }
        let rest = src.split();
        Ok(Some(RawLine::Text(text(&rest))))
    }
}

impl Encoder<String> for ForeignLineCodec {
    type Error = io::Error;

    fn encode(&mut self, line: String, dst: &mut BytesMut) -> io::Result<()> {
        dst.reserve(line.len() + 1);
        dst.put_slice(line.as_bytes());
        dst.put_u8(b'\n');
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(codec: &mut ForeignLineCodec, buf: &mut BytesMut) -> Vec<RawLine> {
        let mut lines = Vec::new();
        while let Some(line) = codec.decode(buf).unwrap() {
            lines.push(line);
        }
        lines
    }

    #[test]
    fn decodes_lines_and_strips_terminators() {
        let mut codec = ForeignLineCodec::new(64);
        let mut buf = BytesMut::from("PING 1\r\nCHAT Bob #town :hi\nWEL");
        assert_eq!(
            decode_all(&mut codec, &mut buf),
            vec![
                RawLine::Text("PING 1".into()),
                RawLine::Text("CHAT Bob #town :hi".into()),
            ]
        );

        buf.extend_from_slice(b"COME\n");
        assert_eq!(
            codec.decode(&mut buf).unwrap(),
            Some(RawLine::Text("WELCOME".into()))
        );
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let mut codec = ForeignLineCodec::new(64);
        let mut buf = BytesMut::from(&b"CHAT Bob #town :\xff\xfe\n"[..]);
        assert_eq!(
            codec.decode(&mut buf).unwrap(),
            Some(RawLine::Text("CHAT Bob #town :\u{fffd}\u{fffd}".into()))
        );
    }

    #[test]
    fn overlong_line_is_skipped_and_reading_resumes() {
        let mut codec = ForeignLineCodec::new(8);
        let mut buf = BytesMut::from("0123456789abc");
        assert_eq!(codec.decode(&mut buf).unwrap(), None);
        assert!(buf.is_empty());

        buf.extend_from_slice(b"def\nPING 2\n");
        assert_eq!(
            decode_all(&mut codec, &mut buf),
            vec![RawLine::Overlong(17), RawLine::Text("PING 2".into())]
        );
    }

    #[test]
    fn overlong_complete_line_is_reported() {
        let mut codec = ForeignLineCodec::new(4);
        let mut buf = BytesMut::from("toolong\nok\n");
        assert_eq!(
            decode_all(&mut codec, &mut buf),
            vec![RawLine::Overlong(8), RawLine::Text("ok".into())]
        );
    }

    #[test]
    fn eof_flushes_the_partial_line() {
        let mut codec = ForeignLineCodec::new(64);
        let mut buf = BytesMut::from("BYE");
        assert_eq!(
            codec.decode_eof(&mut buf).unwrap(),
            Some(RawLine::Text("BYE".into()))
        );
        assert_eq!(codec.decode_eof(&mut buf).unwrap(), None);
    }

    #[test]
    fn encode_appends_newline() {
        let mut codec = ForeignLineCodec::new(64);
        let mut buf = BytesMut::new();
        codec.encode("PONG 1".to_string(), &mut buf).unwrap();
        assert_eq!(&buf[..], b"PONG 1\n");
    }
}
