
use rand::Rng;

const RUNES_ALPHANUMERIC: &[u8] =
    b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

const GUID_SIZE: usize = 12;

/// new_guid returns `prefix` followed by a random base62 identifier, e.g. `TR_x8FqR2mLp0aZ`
pub(crate) fn new_guid(prefix: &str) -> String {
    let mut rng = rand::rng();

    let mut guid = String::with_capacity(prefix.len() + GUID_SIZE);
    guid.push_str(prefix);
    guid.extend((0..GUID_SIZE).map(|_| {
        let idx = rng.random_range(0..RUNES_ALPHANUMERIC.len());
        RUNES_ALPHANUMERIC[idx] as char
    }));
    guid
}
