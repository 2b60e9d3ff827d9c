
use std::fmt;
use std::io::{BufRead, BufReader, Read};

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{Error, Result};

/// NalUnitType is the nal_unit_type field of a NAL header
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub enum NalUnitType {
    #[default]
    Unspecified,
    CodedSliceNonIdr,
    CodedSliceDataPartitionA,
    CodedSliceDataPartitionB,
    CodedSliceDataPartitionC,
    CodedSliceIdr,
    SEI,
    SPS,
    PPS,
    AUD,
    EndOfSequence,
    EndOfStream,
    Filler,
    SpsExt,
    CodedSliceAux,
    /// 14..=18, 20..=23 and the unspecified range 24..=31
    Reserved(u8),
}

impl From<u8> for NalUnitType {
    fn from(v: u8) -> Self {
        match v & 0x1F {
            0 => NalUnitType::Unspecified,
            1 => NalUnitType::CodedSliceNonIdr,
            2 => NalUnitType::CodedSliceDataPartitionA,
            3 => NalUnitType::CodedSliceDataPartitionB,
            4 => NalUnitType::CodedSliceDataPartitionC,
            5 => NalUnitType::CodedSliceIdr,
            6 => NalUnitType::SEI,
            7 => NalUnitType::SPS,
            8 => NalUnitType::PPS,
            9 => NalUnitType::AUD,
            10 => NalUnitType::EndOfSequence,
            11 => NalUnitType::EndOfStream,
            12 => NalUnitType::Filler,
            13 => NalUnitType::SpsExt,
            19 => NalUnitType::CodedSliceAux,
            other => NalUnitType::Reserved(other),
        }
    }
}

impl fmt::Display for NalUnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NalUnitType::Reserved(v) => write!(f, "Reserved({v})"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// NAL is one H.264 Network Abstraction Layer unit, without its start code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NAL {
    pub forbidden_zero_bit: bool,
    pub ref_idc: u8,
    pub unit_type: NalUnitType,

    /// header byte + rbsp
    pub data: Bytes,
}

impl NAL {
    fn new(data: Bytes) -> Self {
        let first_byte = data[0];
        NAL {
            forbidden_zero_bit: first_byte & 0x80 != 0,
            ref_idc: (first_byte & 0x60) >> 5,
            unit_type: NalUnitType::from(first_byte),
            data,
        }
    }
}

/// H264Reader splits an Annex-B byte stream into NAL units
pub struct H264Reader<R: Read> {
    reader: BufReader<R>,
    prefix_parsed: bool,
    zeros: usize,
    nal_buffer: BytesMut,
}

impl<R: Read> H264Reader<R> {
    /// new creates a new `H264Reader` with a `capacity` sized read buffer
    pub fn new(reader: R, capacity: usize) -> H264Reader<R> {
        H264Reader {
            reader: BufReader::with_capacity(capacity, reader),
            prefix_parsed: false,
            zeros: 0,
            nal_buffer: BytesMut::new(),
        }
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        let b = match self.reader.fill_buf()?.first() {
            Some(&b) => b,
            None => return Ok(None),
        };
        self.reader.consume(1);
        Ok(Some(b))
    }

    /// the stream has to open with a 3 or 4 byte start code
    fn parse_prefix(&mut self) -> Result<()> {
        let mut zeros = 0;
        loop {
            match self.read_byte()? {
                None if zeros == 0 => return Err(Error::ErrIoEOF),
                Some(0) if zeros < 3 => zeros += 1,
                Some(1) if zeros >= 2 => return Ok(()),
                _ => return Err(Error::ErrDataIsNotH264Stream),
            }
        }
    }

    /// next_nal returns the next NAL unit of the stream, or
    /// `Error::ErrIoEOF` once the stream is exhausted
    pub fn next_nal(&mut self) -> Result<NAL> {
        if !self.prefix_parsed {
            self.parse_prefix()?;
            self.prefix_parsed = true;
        }

        while let Some(b) = self.read_byte()? {
            match b {
                0 => self.zeros += 1,
                1 if self.zeros >= 2 => {
                    // the zeros of the start code were already buffered
                    let len = self.nal_buffer.len() - self.zeros;
                    self.zeros = 0;
                    self.nal_buffer.truncate(len);
                    if len > 0 {
                        return Ok(NAL::new(self.nal_buffer.split().freeze()));
                    }
                    continue;
                }
                _ => self.zeros = 0,
            }
            self.nal_buffer.put_u8(b);
        }

        self.zeros = 0;
        if self.nal_buffer.is_empty() {
            return Err(Error::ErrIoEOF);
        }
        Ok(NAL::new(self.nal_buffer.split().freeze()))
    }
}
