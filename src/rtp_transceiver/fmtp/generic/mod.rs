#[cfg(test)]
mod generic_test;

use super::*;

/// fmtp_consist reports whether every key present in both `a` and `b` carries
/// the same value, ignoring case.
fn fmtp_consist(a: &HashMap<String, String>, b: &HashMap<String, String>) -> bool {
    a.iter().all(|(k, v)| match b.get(k) {
        Some(vb) => vb.to_uppercase() == v.to_uppercase(),
        None => true,
    })
}

#[derive(Debug, PartialEq)]
pub(crate) struct GenericFmtp {
    pub(crate) mime_type: String,
    pub(crate) parameters: HashMap<String, String>,
}

impl Fmtp for GenericFmtp {
    fn mime_type(&self) -> &str {
        self.mime_type.as_str()
    }

    /// match_fmtp is used for every mime type without dedicated rules: the
    /// mime types must agree and shared keys must not conflict
    fn match_fmtp(&self, f: &(dyn Fmtp)) -> bool {
        match f.as_any().downcast_ref::<GenericFmtp>() {
            Some(c) => {
                self.mime_type.eq_ignore_ascii_case(c.mime_type())
                    && fmtp_consist(&self.parameters, &c.parameters)
            }
            None => false,
        }
    }

    fn parameter(&self, key: &str) -> Option<&String> {
        self.parameters.get(key)
    }

    fn equal(&self, other: &(dyn Fmtp)) -> bool {
        other
            .as_any()
            .downcast_ref::<GenericFmtp>()
            .map_or(false, |a| self == a)
    }

    fn as_any(&self) -> &(dyn Any) {
        self
    }
}
