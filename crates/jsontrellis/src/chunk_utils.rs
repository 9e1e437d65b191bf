//! Helpers that imitate a streamed payload.
use alloc::vec::Vec;

/// Splits `payload` into at most `parts` consecutive pieces of roughly equal
/// character count. Concatenating the pieces yields `payload` again.
///
/// ```rust
/// use jsontrellis::produce_chunks;
///
/// assert_eq!(produce_chunks("héllo!", 3), ["hé", "ll", "o!"]);
/// assert_eq!(produce_chunks("ab", 5), ["a", "b"]);
/// ```
///
/// # Panics
///
/// Panics if `parts` is zero.
#[must_use]
pub fn produce_chunks(payload: &str, parts: usize) -> Vec<&str> {
    assert!(parts > 0, "cannot split a payload into zero parts");

    let boundaries: Vec<usize> = payload
        .char_indices()
        .map(|(offset, _)| offset)
        .chain(core::iter::once(payload.len()))
        .collect();
    let chars = boundaries.len() - 1;
    let per_part = chars.div_ceil(parts).max(1);

    let mut chunks = Vec::with_capacity(parts.min(chars));
    let mut start = 0;
    let ends = boundaries.iter().skip(per_part).step_by(per_part);
    for &end in ends.chain(core::iter::once(&payload.len())) {
        if start < end {
            chunks.push(&payload[start..end]);
            start = end;
        }
    }
    chunks
}

/// The cumulative prefixes a caller in cumulative feed mode would send:
/// each element extends the previous one by the next chunk of
/// [`produce_chunks`], the last one is `payload` itself.
///
/// # Panics
///
/// Panics if `parts` is zero.
#[must_use]
pub fn produce_prefixes(payload: &str, parts: usize) -> Vec<&str> {
    let mut end = 0;
    produce_chunks(payload, parts)
        .into_iter()
        .map(|chunk| {
            end += chunk.len();
            &payload[..end]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use quickcheck_macros::quickcheck;

    use super::{produce_chunks, produce_prefixes};

    #[test]
    fn empty_payload_has_no_chunks() {
        assert!(produce_chunks("", 4).is_empty());
        assert!(produce_prefixes("", 4).is_empty());
    }

    #[test]
    fn prefixes_converge_to_payload() {
        assert_eq!(produce_prefixes("[1,2]", 2), ["[1,", "[1,2]"]);
    }

    #[quickcheck]
    fn chunks_concatenate_to_payload(payload: String, parts: u8) -> bool {
        let parts = usize::from(parts) + 1;
        let chunks = produce_chunks(&payload, parts);
        chunks.len() <= parts && chunks.concat() == payload && chunks.iter().all(|c| !c.is_empty())
    }

    #[quickcheck]
    fn prefixes_grow(payload: String, parts: u8) -> bool {
        let prefixes = produce_prefixes(&payload, usize::from(parts) + 1);
        prefixes.windows(2).all(|w| w[1].starts_with(w[0]) && w[1].len() > w[0].len())
            && prefixes.last().copied().unwrap_or("") == payload
    }
}
