
use bytes::{Buf, BufMut, Bytes};
use util::marshal::{Marshal, MarshalSize, Unmarshal};

use crate::error::{Error, Result};

pub const HEADER_LENGTH: usize = 12;
pub const VERSION_SHIFT: u8 = 6;
pub const VERSION_MASK: u8 = 0x3;
pub const PADDING_SHIFT: u8 = 5;
pub const PADDING_MASK: u8 = 0x1;
pub const EXTENSION_SHIFT: u8 = 4;
pub const EXTENSION_MASK: u8 = 0x1;
pub const CC_MASK: u8 = 0xF;
pub const MARKER_SHIFT: u8 = 7;
pub const MARKER_MASK: u8 = 0x1;
pub const PT_MASK: u8 = 0x7F;
pub const CSRC_LENGTH: usize = 4;

pub const EXTENSION_PROFILE_ONE_BYTE: u16 = 0xBEDE;
pub const EXTENSION_PROFILE_TWO_BYTE: u16 = 0x1000;
pub const EXTENSION_ID_RESERVED: u8 = 0xF;

/// A single RFC 8285 header extension element
#[derive(Debug, Eq, PartialEq, Default, Clone)]
pub struct Extension {
    pub id: u8,
    pub payload: Bytes,
}

/// Header represents an RTP packet header
#[derive(Debug, Eq, PartialEq, Default, Clone)]
pub struct Header {
    pub version: u8,
    pub padding: bool,
    pub extension: bool,
    pub marker: bool,
    pub payload_type: u8,
    pub sequence_number: u16,
    pub timestamp: u32,
    pub ssrc: u32,
    pub csrc: Vec<u32>,
    pub extension_profile: u16,
    pub extensions: Vec<Extension>,
}

impl Unmarshal for Header {
    /// unmarshal parses the passed buffer and returns the header, leaving the
    /// buffer positioned at the start of the payload
    fn unmarshal<B>(raw_packet: &mut B) -> std::result::Result<Self, util::Error>
    where
        Self: Sized,
        B: Buf,
    {
        /*
         *  0                   1                   2                   3
         *  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
         * +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
         * |V=2|P|X|  CC   |M|     PT      |       sequence number         |
         * +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
         * |                           timestamp                           |
         * +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
         * |           synchronization source (SSRC) identifier            |
         * +=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+
         * |            contributing source (CSRC) identifiers             |
         * |                             ....                              |
         * +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
         */
        if raw_packet.remaining() < HEADER_LENGTH {
            return Err(Error::ErrHeaderSizeInsufficient.into());
        }

        let b0 = raw_packet.get_u8();
        let version = b0 >> VERSION_SHIFT & VERSION_MASK;
        let padding = (b0 >> PADDING_SHIFT & PADDING_MASK) > 0;
        let extension = (b0 >> EXTENSION_SHIFT & EXTENSION_MASK) > 0;
        let cc = (b0 & CC_MASK) as usize;

        let b1 = raw_packet.get_u8();
        let marker = (b1 >> MARKER_SHIFT & MARKER_MASK) > 0;
        let payload_type = b1 & PT_MASK;

        let sequence_number = raw_packet.get_u16();
        let timestamp = raw_packet.get_u32();
        let ssrc = raw_packet.get_u32();

        if raw_packet.remaining() < cc * CSRC_LENGTH {
            return Err(Error::ErrHeaderSizeInsufficient.into());
        }
        let csrc = (0..cc).map(|_| raw_packet.get_u32()).collect();

        let (extension_profile, extensions) = if extension {
            if raw_packet.remaining() < 4 {
                return Err(Error::ErrHeaderSizeInsufficientForExtension.into());
            }
            let profile = raw_packet.get_u16();
            let length = raw_packet.get_u16() as usize * 4;
            if raw_packet.remaining() < length {
                return Err(Error::ErrHeaderSizeInsufficientForExtension.into());
            }
            let mut block = raw_packet.copy_to_bytes(length);
            (profile, parse_extensions(profile, &mut block)?)
        } else {
            (0, vec![])
        };

        Ok(Header {
            version,
            padding,
            extension,
            marker,
            payload_type,
            sequence_number,
            timestamp,
            ssrc,
            csrc,
            extension_profile,
            extensions,
        })
    }
}

fn parse_extensions(profile: u16, block: &mut Bytes) -> Result<Vec<Extension>> {
    let mut extensions = vec![];
    match profile {
        // RFC 8285 one-byte header: 4 bit id, 4 bit (length - 1)
        EXTENSION_PROFILE_ONE_BYTE => {
            while block.has_remaining() {
                let b = block.get_u8();
                if b == 0x00 {
                    continue;
                }
                let id = b >> 4;
                if id == EXTENSION_ID_RESERVED {
                    break;
                }
                let len = (b & 0x0F) as usize + 1;
                if block.remaining() < len {
                    return Err(Error::ErrHeaderSizeInsufficientForExtension);
                }
                extensions.push(Extension {
                    id,
                    payload: block.split_to(len),
                });
            }
        }
        // RFC 8285 two-byte header: 8 bit id, 8 bit length
        EXTENSION_PROFILE_TWO_BYTE => {
            while block.has_remaining() {
                let id = block.get_u8();
                if id == 0x00 {
                    continue;
                }
                if !block.has_remaining() {
                    return Err(Error::ErrHeaderSizeInsufficientForExtension);
                }
                let len = block.get_u8() as usize;
                if block.remaining() < len {
                    return Err(Error::ErrHeaderSizeInsufficientForExtension);
                }
                extensions.push(Extension {
                    id,
                    payload: block.split_to(len),
                });
            }
        }
        // RFC 3550 extension, opaque to us
        _ => extensions.push(Extension {
            id: 0,
            payload: block.split_to(block.len()),
        }),
    }
    Ok(extensions)
}

impl MarshalSize for Header {
    fn marshal_size(&self) -> usize {
        let mut size = HEADER_LENGTH + self.csrc.len() * CSRC_LENGTH;
        if self.extension {
            size += 4 + self.extension_payload_words() * 4;
        }
        size
    }
}

impl Marshal for Header {
    /// marshal_to serializes the header into buf and returns the written size
    fn marshal_to(&self, mut buf: &mut [u8]) -> std::result::Result<usize, util::Error> {
        let size = self.marshal_size();
        if buf.remaining_mut() < size {
            return Err(Error::ErrBufferTooSmall.into());
        }

        let mut b0 = (self.version << VERSION_SHIFT) | self.csrc.len() as u8;
        if self.padding {
            b0 |= 1 << PADDING_SHIFT;
        }
        if self.extension {
            b0 |= 1 << EXTENSION_SHIFT;
        }
        buf.put_u8(b0);

        let mut b1 = self.payload_type;
        if self.marker {
            b1 |= 1 << MARKER_SHIFT;
        }
        buf.put_u8(b1);

        buf.put_u16(self.sequence_number);
        buf.put_u32(self.timestamp);
        buf.put_u32(self.ssrc);
        for csrc in &self.csrc {
            buf.put_u32(*csrc);
        }

        if self.extension {
            let payload_len = self.extension_payload_len();
            let words = self.extension_payload_words();
            buf.put_u16(self.extension_profile);
            buf.put_u16(words as u16);

            match self.extension_profile {
                EXTENSION_PROFILE_ONE_BYTE => {
                    for extension in &self.extensions {
                        buf.put_u8((extension.id << 4) | (extension.payload.len() as u8 - 1));
                        buf.put_slice(&extension.payload);
                    }
                }
                EXTENSION_PROFILE_TWO_BYTE => {
                    for extension in &self.extensions {
                        buf.put_u8(extension.id);
                        buf.put_u8(extension.payload.len() as u8);
                        buf.put_slice(&extension.payload);
                    }
                }
                _ => {
                    if self.extensions.len() != 1 {
                        return Err(Error::ErrRfc3550headerIdrange.into());
                    }
                    if payload_len % 4 != 0 {
                        return Err(Error::HeaderExtensionPayloadNot32BitWords.into());
                    }
                    buf.put_slice(&self.extensions[0].payload);
                }
            }

            // pad the extension block to a 32-bit boundary
            for _ in payload_len..words * 4 {
                buf.put_u8(0);
            }
        }

        Ok(size)
    }
}

impl Header {
    /// extension_payload_len is the unpadded size of the extension block,
    /// element headers included
    pub fn extension_payload_len(&self) -> usize {
        let element_header = match self.extension_profile {
            EXTENSION_PROFILE_ONE_BYTE => 1,
            EXTENSION_PROFILE_TWO_BYTE => 2,
            _ => 0,
        };
        self.extensions
            .iter()
            .map(|e| element_header + e.payload.len())
            .sum()
    }

    fn extension_payload_words(&self) -> usize {
        (self.extension_payload_len() + 3) / 4
    }

    /// set_extension sets an RTP header extension, replacing an existing
    /// element with the same id. The first extension picks the profile: the
    /// one-byte form for payloads of up to 16 bytes, two-byte otherwise.
    pub fn set_extension(&mut self, id: u8, payload: Bytes) -> Result<()> {
        if !self.extension {
            self.extension_profile = match payload.len() {
                1..=16 => EXTENSION_PROFILE_ONE_BYTE,
                _ => EXTENSION_PROFILE_TWO_BYTE,
            };
        }

        match self.extension_profile {
            EXTENSION_PROFILE_ONE_BYTE => {
                if !(1..=14).contains(&id) {
                    return Err(Error::ErrRfc8285oneByteHeaderIdrange);
                }
                if payload.is_empty() || payload.len() > 16 {
                    return Err(Error::ErrRfc8285oneByteHeaderSize);
                }
            }
            EXTENSION_PROFILE_TWO_BYTE => {
                if id < 1 {
                    return Err(Error::ErrRfc8285twoByteHeaderIdrange);
                }
                if payload.len() > 255 {
                    return Err(Error::ErrRfc8285twoByteHeaderSize);
                }
            }
            _ => {
                if id != 0 {
                    return Err(Error::ErrRfc3550headerIdrange);
                }
            }
        }

        self.extension = true;
        if let Some(extension) = self.extensions.iter_mut().find(|e| e.id == id) {
            extension.payload = payload;
        } else {
            self.extensions.push(Extension { id, payload });
        }
        Ok(())
    }

    /// get_extension_ids returns the ids of all extensions present
    pub fn get_extension_ids(&self) -> Vec<u8> {
        if self.extension {
            self.extensions.iter().map(|e| e.id).collect()
        } else {
            vec![]
        }
    }

    /// get_extension returns the payload of the extension with the given id
    pub fn get_extension(&self, id: u8) -> Option<Bytes> {
        if !self.extension {
            return None;
        }
        self.extensions
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.payload.clone())
    }

    /// del_extension removes the extension with the given id
    pub fn del_extension(&mut self, id: u8) -> Result<()> {
        if !self.extension {
            return Err(Error::ErrHeaderExtensionsNotEnabled);
        }
        let index = self
            .extensions
            .iter()
            .position(|e| e.id == id)
            .ok_or(Error::ErrHeaderExtensionNotFound)?;
        self.extensions.remove(index);
        Ok(())
    }
}
