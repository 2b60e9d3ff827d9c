#[cfg(test)]
mod vp8_test;

use bytes::{BufMut, Bytes, BytesMut};

use super::fragments;
use crate::error::Result;
use crate::packetizer::Payloader;

pub const VP8_HEADER_SIZE: usize = 1;

/// Vp8Payloader payloads VP8 packets (RFC 7741)
#[derive(Default, Debug, Copy, Clone)]
pub struct Vp8Payloader {
    /// carry a 7 or 15 bit PictureID in every payload descriptor
    pub enable_picture_id: bool,
    picture_id: u16,
}

impl Vp8Payloader {
    /// descriptor builds the payload descriptor for one fragment
    ///
    /// ```text
    ///       0 1 2 3 4 5 6 7
    ///      +-+-+-+-+-+-+-+-+
    ///      |X|R|N|S|R| PID | (REQUIRED)
    ///      +-+-+-+-+-+-+-+-+
    /// X:   |I|L|T|K| RSV   | (OPTIONAL)
    ///      +-+-+-+-+-+-+-+-+
    /// I:   |M| PictureID   | (OPTIONAL)
    ///      +-+-+-+-+-+-+-+-+
    /// ```
    fn descriptor(&self, start: bool) -> ([u8; 4], usize) {
        let mut buf = [0u8; 4];
        if start {
            buf[0] = 0x10;
        }
        if !self.enable_picture_id {
            return (buf, VP8_HEADER_SIZE);
        }

        buf[0] |= 0x80;
        buf[1] = 0x80;
        if self.picture_id < 128 {
            buf[2] = self.picture_id as u8;
            (buf, VP8_HEADER_SIZE + 2)
        } else {
            buf[2] = 0x80 | ((self.picture_id >> 8) & 0x7F) as u8;
            buf[3] = (self.picture_id & 0xFF) as u8;
            (buf, VP8_HEADER_SIZE + 3)
        }
    }
}

impl Payloader for Vp8Payloader {
    /// payload fragments a VP8 frame across one or more byte arrays
    fn payload(&mut self, mtu: usize, payload: &Bytes) -> Result<Vec<Bytes>> {
        if payload.is_empty() || mtu == 0 {
            return Ok(vec![]);
        }

        let (_, header_size) = self.descriptor(false);
        let max_fragment_size = match mtu.checked_sub(header_size) {
            Some(n) if n > 0 => n,
            _ => return Ok(vec![]),
        };

        let payloads = fragments(payload, max_fragment_size)
            .enumerate()
            .map(|(i, fragment)| {
                // S is set only on the first fragment of the frame
                let (descriptor, size) = self.descriptor(i == 0);
                let mut out = BytesMut::with_capacity(size + fragment.len());
                out.put_slice(&descriptor[..size]);
                out.put(fragment);
                out.freeze()
            })
            .collect();

        self.picture_id = (self.picture_id + 1) & 0x7FFF;

        Ok(payloads)
    }

    fn clone_to(&self) -> Box<dyn Payloader + Send + Sync> {
        Box::new(*self)
    }
}
