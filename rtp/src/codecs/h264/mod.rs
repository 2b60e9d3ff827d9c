#[cfg(test)]
mod h264_test;

use bytes::{BufMut, Bytes, BytesMut};

use super::fragments;
use crate::error::Result;
use crate::packetizer::Payloader;

pub const STAPA_NALU_TYPE: u8 = 24;
pub const FUA_NALU_TYPE: u8 = 28;
pub const SPS_NALU_TYPE: u8 = 7;
pub const PPS_NALU_TYPE: u8 = 8;
pub const AUD_NALU_TYPE: u8 = 9;
pub const FILLER_NALU_TYPE: u8 = 12;

pub const FUA_HEADER_SIZE: usize = 2;
pub const STAPA_HEADER_SIZE: usize = 1;
pub const STAPA_NALU_LENGTH_SIZE: usize = 2;

pub const NALU_TYPE_BITMASK: u8 = 0x1F;
pub const NALU_REF_IDC_BITMASK: u8 = 0x60;
pub const FU_START_BITMASK: u8 = 0x80;
pub const FU_END_BITMASK: u8 = 0x40;

/// STAP-A indicator with NRI 3
pub const OUTPUT_STAP_AHEADER: u8 = 0x78;

/// H264Payloader payloads H264 packets (RFC 6184)
///
/// SPS and PPS units are held back and sent as one STAP-A aggregate ahead
/// of the next NAL unit.
#[derive(Default, Debug, Clone)]
pub struct H264Payloader {
    sps_nalu: Option<Bytes>,
    pps_nalu: Option<Bytes>,
}

/// find_start_code returns the offset and length of the first Annex-B start
/// code (`00 00 01` or `00 00 00 01`) at or after `from`
fn find_start_code(data: &[u8], from: usize) -> Option<(usize, usize)> {
    let mut zeros = 0;
    for (i, &b) in data.iter().enumerate().skip(from) {
        match b {
            0 => zeros += 1,
            1 if zeros >= 2 => return Some((i - zeros, zeros + 1)),
            _ => zeros = 0,
        }
    }
    None
}

impl H264Payloader {
    fn emit(&mut self, nalu: Bytes, mtu: usize, payloads: &mut Vec<Bytes>) {
        if nalu.is_empty() {
            return;
        }

        let nalu_type = nalu[0] & NALU_TYPE_BITMASK;
        let nalu_ref_idc = nalu[0] & NALU_REF_IDC_BITMASK;

        match nalu_type {
            AUD_NALU_TYPE | FILLER_NALU_TYPE => return,
            SPS_NALU_TYPE => {
                self.sps_nalu = Some(nalu);
                return;
            }
            PPS_NALU_TYPE => {
                self.pps_nalu = Some(nalu);
                return;
            }
            _ => {}
        }

        if let (Some(sps), Some(pps)) = (&self.sps_nalu, &self.pps_nalu) {
            let stap_a = Self::stap_a(&[sps, pps]);
            if stap_a.len() <= mtu {
                payloads.push(stap_a);
            }
            self.sps_nalu = None;
            self.pps_nalu = None;
        }

        // Single NAL unit mode
        if nalu.len() <= mtu {
            payloads.push(nalu);
            return;
        }

        // FU-A. The NAL header octet is not carried in the fragments, its F and
        // NRI bits move into the FU indicator and its type into the FU header.
        let max_fragment_size = match mtu.checked_sub(FUA_HEADER_SIZE) {
            Some(n) if n > 0 => n,
            _ => return,
        };
        let body = nalu.slice(1..);
        let count = (body.len() + max_fragment_size - 1) / max_fragment_size;

        for (i, fragment) in fragments(&body, max_fragment_size).enumerate() {
            let mut out = BytesMut::with_capacity(FUA_HEADER_SIZE + fragment.len());
            // +---------------+
            // |0|1|2|3|4|5|6|7|
            // +-+-+-+-+-+-+-+-+
            // |F|NRI|  Type   |
            // +---------------+
            out.put_u8(FUA_NALU_TYPE | nalu_ref_idc);

            // +---------------+
            // |0|1|2|3|4|5|6|7|
            // +-+-+-+-+-+-+-+-+
            // |S|E|R|  Type   |
            // +---------------+
            let mut fu_header = nalu_type;
            if i == 0 {
                fu_header |= FU_START_BITMASK;
            } else if i == count - 1 {
                fu_header |= FU_END_BITMASK;
            }
            out.put_u8(fu_header);
            out.put(fragment);
            payloads.push(out.freeze());
        }
    }

    fn stap_a(nalus: &[&Bytes]) -> Bytes {
        let size = STAPA_HEADER_SIZE
            + nalus
                .iter()
                .map(|n| STAPA_NALU_LENGTH_SIZE + n.len())
                .sum::<usize>();
        let mut out = BytesMut::with_capacity(size);
        out.put_u8(OUTPUT_STAP_AHEADER);
        for nalu in nalus {
            out.put_u16(nalu.len() as u16);
            out.put_slice(nalu);
        }
        out.freeze()
    }
}

impl Payloader for H264Payloader {
    /// payload splits an Annex-B access unit into NAL units and fragments
    /// them across one or more payloads
    fn payload(&mut self, mtu: usize, payload: &Bytes) -> Result<Vec<Bytes>> {
        if payload.is_empty() || mtu == 0 {
            return Ok(vec![]);
        }

        let mut payloads = vec![];

        let Some((start, len)) = find_start_code(payload, 0) else {
            // a bare NAL unit without start code
            self.emit(payload.clone(), mtu, &mut payloads);
            return Ok(payloads);
        };

        let mut nalu_start = start + len;
        while let Some((next_start, next_len)) = find_start_code(payload, nalu_start) {
            self.emit(payload.slice(nalu_start..next_start), mtu, &mut payloads);
            nalu_start = next_start + next_len;
        }
        self.emit(payload.slice(nalu_start..), mtu, &mut payloads);

        Ok(payloads)
    }

    fn clone_to(&self) -> Box<dyn Payloader + Send + Sync> {
        Box::new(self.clone())
    }
}
