
use std::io::{self, Read};
use std::time::Duration;

use byteorder::{LittleEndian, ReadBytesExt};
use bytes::{Bytes, BytesMut};

use crate::error::{Error, Result};

pub const IVF_FILE_HEADER_SIGNATURE: &[u8] = b"DKIF";
pub const IVF_FILE_HEADER_SIZE: usize = 32;
pub const IVF_FRAME_HEADER_SIZE: usize = 12;

/// IVFFileHeader 32-byte header for IVF files
/// <https://wiki.multimedia.cx/index.php/IVF>
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub struct IVFFileHeader {
    pub signature: [u8; 4],        // 0-3
    pub version: u16,              // 4-5
    pub header_size: u16,          // 6-7
    pub four_cc: [u8; 4],          // 8-11
    pub width: u16,                // 12-13
    pub height: u16,               // 14-15
    pub timebase_denominator: u32, // 16-19
    pub timebase_numerator: u32,   // 20-23
    pub num_frames: u32,           // 24-27
    pub unused: u32,               // 28-31
}

impl IVFFileHeader {
    /// frame_duration is one timebase tick, `numerator / denominator`
    /// seconds. None for a zero denominator.
    pub fn frame_duration(&self) -> Option<Duration> {
        if self.timebase_denominator == 0 {
            return None;
        }
        let nanos = self.timebase_numerator as u64 * 1_000_000_000
            / self.timebase_denominator as u64;
        Some(Duration::from_nanos(nanos))
    }
}

/// IVFFrameHeader 12-byte header for IVF frames
/// <https://wiki.multimedia.cx/index.php/IVF>
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub struct IVFFrameHeader {
    pub frame_size: u32, // 0-3
    pub timestamp: u64,  // 4-11
}

/// IVFReader is used to read IVF files and return frame payloads
pub struct IVFReader<R: Read> {
    reader: R,
    bytes_read: usize,
}

/// read_full fills buf as far as the reader allows and returns the count
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err) => return Err(err),
        }
    }
    Ok(filled)
}

impl<R: Read> IVFReader<R> {
    /// new returns a new IVF reader and the parsed IVF file header
    pub fn new(reader: R) -> Result<(IVFReader<R>, IVFFileHeader)> {
        let mut r = IVFReader {
            reader,
            bytes_read: 0,
        };

        let header = r.parse_file_header()?;

        Ok((r, header))
    }

    /// bytes_read is the stream offset of the next frame header
    pub fn bytes_read(&self) -> usize {
        self.bytes_read
    }

    /// parse_next_frame returns the next frame payload and header.
    /// A stream ending cleanly at a frame boundary yields `Error::ErrIoEOF`,
    /// a truncated frame `ErrIncompleteFrameHeader` or `ErrIncompleteFrameData`.
    pub fn parse_next_frame(&mut self) -> Result<(Bytes, IVFFrameHeader)> {
        let mut raw = [0u8; IVF_FRAME_HEADER_SIZE];
        match read_full(&mut self.reader, &mut raw)? {
            0 => return Err(Error::ErrIoEOF),
            IVF_FRAME_HEADER_SIZE => {}
            _ => return Err(Error::ErrIncompleteFrameHeader),
        }

        let mut fields = &raw[..];
        let header = IVFFrameHeader {
            frame_size: fields.read_u32::<LittleEndian>()?,
            timestamp: fields.read_u64::<LittleEndian>()?,
        };

        let mut payload = BytesMut::with_capacity(header.frame_size as usize);
        payload.resize(header.frame_size as usize, 0);
        if read_full(&mut self.reader, &mut payload)? < payload.len() {
            return Err(Error::ErrIncompleteFrameData);
        }

        self.bytes_read += IVF_FRAME_HEADER_SIZE + header.frame_size as usize;

        Ok((payload.freeze(), header))
    }

    /// parse_file_header reads the 32 byte file header, always called
    /// before parse_next_frame
    fn parse_file_header(&mut self) -> Result<IVFFileHeader> {
        let mut raw = [0u8; IVF_FILE_HEADER_SIZE];
        if read_full(&mut self.reader, &mut raw)? < IVF_FILE_HEADER_SIZE {
            return Err(Error::ErrIncompleteFileHeader);
        }

        let mut fields = &raw[..];
        let mut signature = [0u8; 4];
        let mut four_cc = [0u8; 4];

        fields.read_exact(&mut signature)?;
        let version = fields.read_u16::<LittleEndian>()?;
        let header_size = fields.read_u16::<LittleEndian>()?;
        fields.read_exact(&mut four_cc)?;
        let header = IVFFileHeader {
            signature,
            version,
            header_size,
            four_cc,
            width: fields.read_u16::<LittleEndian>()?,
            height: fields.read_u16::<LittleEndian>()?,
            timebase_denominator: fields.read_u32::<LittleEndian>()?,
            timebase_numerator: fields.read_u32::<LittleEndian>()?,
            num_frames: fields.read_u32::<LittleEndian>()?,
            unused: fields.read_u32::<LittleEndian>()?,
        };

        if header.signature != IVF_FILE_HEADER_SIGNATURE {
            return Err(Error::ErrSignatureMismatch);
        } else if header.version != 0 {
            return Err(Error::ErrUnknownIVFVersion);
        }

        self.bytes_read += IVF_FILE_HEADER_SIZE;

        Ok(header)
    }
}
