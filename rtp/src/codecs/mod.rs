use bytes::Bytes;

pub mod g7xx;
pub mod h264;
pub mod opus;
pub mod vp8;
pub mod vp9;

/// fragments splits a payload into consecutive slices of at most `max_size`
/// bytes. `max_size` must be non-zero.
pub(crate) fn fragments(payload: &Bytes, max_size: usize) -> impl Iterator<Item = Bytes> + '_ {
    (0..payload.len())
        .step_by(max_size)
        .map(move |start| payload.slice(start..payload.len().min(start + max_size)))
}
