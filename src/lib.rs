#![warn(rust_2018_idioms)]
#![allow(dead_code)]

pub use {media, rtp, util};

pub mod error;
pub mod provider;
pub mod rtp_transceiver;
pub mod track;
pub mod transport;
pub(crate) mod utilities;

pub use error::Error;

pub(crate) const UNSPECIFIED_STR: &str = "Unspecified";
