pub(crate) mod generic;
pub(crate) mod h264;

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

use crate::rtp_transceiver::fmtp::generic::GenericFmtp;
use crate::rtp_transceiver::fmtp::h264::H264Fmtp;

/// Fmtp interface for implementing custom
/// Fmtp parsers based on mime_type
pub(crate) trait Fmtp: fmt::Debug {
    /// mime_type returns the mime_type associated with
    /// the fmtp
    fn mime_type(&self) -> &str;

    /// match_fmtp compares two fmtp descriptions for
    /// compatibility based on the mime_type
    fn match_fmtp(&self, f: &(dyn Fmtp)) -> bool;

    /// parameter returns a value for the associated key
    /// if contained in the parsed fmtp string
    fn parameter(&self, key: &str) -> Option<&String>;

    fn equal(&self, other: &(dyn Fmtp)) -> bool;
    fn as_any(&self) -> &(dyn Any);
}

impl PartialEq for dyn Fmtp {
    fn eq(&self, other: &Self) -> bool {
        self.equal(other)
    }
}

/// parse parses an fmtp string based on the MimeType. Keys are lowercased,
/// values are kept verbatim.
pub(crate) fn parse(mime_type: &str, line: &str) -> Box<dyn Fmtp> {
    let parameters: HashMap<String, String> = line
        .split(';')
        .map(|p| {
            let p = p.trim();
            match p.split_once('=') {
                Some((key, value)) => (key.to_lowercase(), value.to_owned()),
                None => (p.to_lowercase(), String::new()),
            }
        })
        .collect();

    if mime_type.eq_ignore_ascii_case(h264::MIME_TYPE) {
        Box::new(H264Fmtp { parameters })
    } else {
        Box::new(GenericFmtp {
            mime_type: mime_type.to_owned(),
            parameters,
        })
    }
}
