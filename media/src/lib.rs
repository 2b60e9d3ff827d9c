#![warn(rust_2018_idioms)]
#![allow(dead_code)]

mod error;
pub mod io;

pub use error::{Error, IoError, Result};

use std::time::{Duration, SystemTime};

use bytes::Bytes;

/// A Sample contains encoded media and timing information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub data: Bytes,
    /// wall-clock capture time
    pub timestamp: SystemTime,
    /// intended playout duration, drives both pacing and the RTP timestamp
    pub duration: Duration,
    pub packet_timestamp: u32,
    /// number of samples dropped right before this one
    pub prev_dropped_packets: u16,
}

impl Default for Sample {
    fn default() -> Self {
        Sample {
            data: Bytes::new(),
            timestamp: SystemTime::now(),
            duration: Duration::from_secs(0),
            packet_timestamp: 0,
            prev_dropped_packets: 0,
        }
    }
}
