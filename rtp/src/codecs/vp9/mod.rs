
use std::fmt;
use std::sync::Arc;

use bytes::{BufMut, Bytes, BytesMut};

use super::fragments;
use crate::error::Result;
use crate::packetizer::Payloader;

/// Flexible mode descriptor with a 15 bit picture ID
const VP9HEADER_SIZE: usize = 3;

/// InitialPictureIDFn is a function that returns random initial picture ID.
pub type InitialPictureIDFn = Arc<dyn (Fn() -> u16) + Send + Sync>;

/// Vp9Payloader payloads VP9 packets in flexible mode
#[derive(Default, Clone)]
pub struct Vp9Payloader {
    picture_id: u16,
    initialized: bool,

    pub initial_picture_id_fn: Option<InitialPictureIDFn>,
}

impl fmt::Debug for Vp9Payloader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vp9Payloader")
            .field("picture_id", &self.picture_id)
            .field("initialized", &self.initialized)
            .finish()
    }
}

impl Payloader for Vp9Payloader {
    /// payload fragments a VP9 frame across one or more byte arrays
    ///
    /// ```text
    ///        0 1 2 3 4 5 6 7
    ///       +-+-+-+-+-+-+-+-+
    ///       |I|P|L|F|B|E|V|Z| (REQUIRED)
    ///       +-+-+-+-+-+-+-+-+
    ///  I:   |M| PICTURE ID  | (REQUIRED)
    ///       +-+-+-+-+-+-+-+-+
    ///  M:   | EXTENDED PID  | (RECOMMENDED)
    ///       +-+-+-+-+-+-+-+-+
    /// ```
    fn payload(&mut self, mtu: usize, payload: &Bytes) -> Result<Vec<Bytes>> {
        if payload.is_empty() || mtu == 0 {
            return Ok(vec![]);
        }

        if !self.initialized {
            self.picture_id = match &self.initial_picture_id_fn {
                Some(f) => f() & 0x7FFF,
                None => rand::random::<u16>() & 0x7FFF,
            };
            self.initialized = true;
        }

        let max_fragment_size = match mtu.checked_sub(VP9HEADER_SIZE) {
            Some(n) if n > 0 => n,
            _ => return Ok(vec![]),
        };

        let mut payloads = vec![];
        let mut consumed = 0;
        for fragment in fragments(payload, max_fragment_size) {
            let mut b0 = 0x90; // F=1 I=1
            if consumed == 0 {
                b0 |= 0x08; // B=1
            }
            consumed += fragment.len();
            if consumed == payload.len() {
                b0 |= 0x04; // E=1
            }

            let mut out = BytesMut::with_capacity(VP9HEADER_SIZE + fragment.len());
            out.put_u8(b0);
            out.put_u16(0x8000 | self.picture_id);
            out.put(fragment);
            payloads.push(out.freeze());
        }

        self.picture_id = (self.picture_id + 1) & 0x7FFF;

        Ok(payloads)
    }

    fn clone_to(&self) -> Box<dyn Payloader + Send + Sync> {
        Box::new(self.clone())
    }
}
