#[cfg(test)]
mod packet_test;

use std::fmt;

use bytes::{Buf, BufMut, Bytes};
use util::marshal::{Marshal, MarshalSize, Unmarshal};

use crate::error::Error;
use crate::header::*;

/// Packet represents an RTP Packet
#[derive(Debug, Eq, PartialEq, Default, Clone)]
pub struct Packet {
    pub header: Header,
    pub payload: Bytes,
    /// number of trailing padding bytes, the last of which carries the count.
    /// Only written when `header.padding` is set.
    pub padding_size: u8,
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "RTP PACKET:")?;
        writeln!(f, "\tVersion: {}", self.header.version)?;
        writeln!(f, "\tMarker: {}", self.header.marker)?;
        writeln!(f, "\tPayload Type: {}", self.header.payload_type)?;
        writeln!(f, "\tSequence Number: {}", self.header.sequence_number)?;
        writeln!(f, "\tTimestamp: {}", self.header.timestamp)?;
        writeln!(f, "\tSSRC: {} ({:x})", self.header.ssrc, self.header.ssrc)?;
        writeln!(f, "\tPayload Length: {}", self.payload.len())
    }
}

impl Unmarshal for Packet {
    /// unmarshal parses the passed buffer into a packet, removing any trailing
    /// padding from the payload
    fn unmarshal<B>(raw_packet: &mut B) -> Result<Self, util::Error>
    where
        Self: Sized,
        B: Buf,
    {
        let header = Header::unmarshal(raw_packet)?;
        let mut payload = raw_packet.copy_to_bytes(raw_packet.remaining());

        let padding_size = if header.padding {
            let Some(&last) = payload.last() else {
                return Err(Error::ErrShortPacket.into());
            };
            if last == 0 || last as usize > payload.len() {
                return Err(Error::ErrTooSmallPadding.into());
            }
            payload.truncate(payload.len() - last as usize);
            last
        } else {
            0
        };

        Ok(Packet {
            header,
            payload,
            padding_size,
        })
    }
}

impl MarshalSize for Packet {
    fn marshal_size(&self) -> usize {
        self.header.marshal_size() + self.payload.len() + self.padding_len()
    }
}

impl Marshal for Packet {
    fn marshal_to(&self, buf: &mut [u8]) -> Result<usize, util::Error> {
        if buf.len() < self.marshal_size() {
            return Err(Error::ErrBufferTooSmall.into());
        }

        let n = self.header.marshal_to(buf)?;
        let mut rest = &mut buf[n..];
        rest.put_slice(&self.payload);

        let padding_len = self.padding_len();
        if padding_len > 0 {
            rest.put_bytes(0, padding_len - 1);
            rest.put_u8(padding_len as u8);
        }

        Ok(n + self.payload.len() + padding_len)
    }
}

impl Packet {
    fn padding_len(&self) -> usize {
        if self.header.padding {
            self.padding_size as usize
        } else {
            0
        }
    }
}
