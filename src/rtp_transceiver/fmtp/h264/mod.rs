
use super::*;

pub(crate) const MIME_TYPE: &str = "video/h264";

const PACKETIZATION_MODE: &str = "packetization-mode";
const PROFILE_LEVEL_ID: &str = "profile-level-id";

/// profile_level_id_matches compares profile_idc and profile-iop, the level
/// byte is allowed to differ
fn profile_level_id_matches(a: &str, b: &str) -> bool {
    let (aa, bb) = match (hex::decode(a), hex::decode(b)) {
        (Ok(aa), Ok(bb)) => (aa, bb),
        _ => return false,
    };
    if aa.len() < 2 || bb.len() < 2 {
        return false;
    }

    aa[..2] == bb[..2]
}

#[derive(Debug, PartialEq)]
pub(crate) struct H264Fmtp {
    pub(crate) parameters: HashMap<String, String>,
}

impl Fmtp for H264Fmtp {
    fn mime_type(&self) -> &str {
        MIME_TYPE
    }

    /// match_fmtp follows RFC6184 Section 8.2.2: packetization-mode and the
    /// profile part of profile-level-id are used symmetrically, the level part
    /// is not.
    fn match_fmtp(&self, f: &(dyn Fmtp)) -> bool {
        let c = match f.as_any().downcast_ref::<H264Fmtp>() {
            Some(c) => c,
            None => return false,
        };

        match (
            self.parameters.get(PACKETIZATION_MODE),
            c.parameters.get(PACKETIZATION_MODE),
        ) {
            (Some(a), Some(b)) if a == b => {}
            _ => return false,
        }

        match (
            self.parameters.get(PROFILE_LEVEL_ID),
            c.parameters.get(PROFILE_LEVEL_ID),
        ) {
            (Some(a), Some(b)) => profile_level_id_matches(a, b),
            _ => false,
        }
    }

    fn parameter(&self, key: &str) -> Option<&String> {
        self.parameters.get(key)
    }

    fn equal(&self, other: &(dyn Fmtp)) -> bool {
        other
            .as_any()
            .downcast_ref::<H264Fmtp>()
            .map_or(false, |a| self == a)
    }

    fn as_any(&self) -> &(dyn Any) {
        self
    }
}
