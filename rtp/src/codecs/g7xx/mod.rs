
use bytes::Bytes;

use super::fragments;
use crate::error::Result;
use crate::packetizer::Payloader;

/// G711Payloader payloads G711 (PCMU/PCMA) packets
pub type G711Payloader = G7xxPayloader;
/// G722Payloader payloads G722 packets
pub type G722Payloader = G7xxPayloader;

/// G7xxPayloader splits a sample into MTU sized chunks. The G.7xx formats
/// are sample aligned so any split point is valid.
#[derive(Default, Debug, Copy, Clone)]
pub struct G7xxPayloader;

impl Payloader for G7xxPayloader {
    fn payload(&mut self, mtu: usize, payload: &Bytes) -> Result<Vec<Bytes>> {
        if payload.is_empty() || mtu == 0 {
            return Ok(vec![]);
        }
        Ok(fragments(payload, mtu).collect())
    }

    fn clone_to(&self) -> Box<dyn Payloader + Send + Sync> {
        Box::new(*self)
    }
}
