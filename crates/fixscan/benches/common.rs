use fixscan::Fixture;

/// Deterministically create a FIX-like message of exactly `target_len` bytes
/// by repeating the canonical message and truncating.
pub fn make_message(target_len: usize) -> Fixture {
    let canonical = Fixture::canonical();
    let bytes: Vec<u8> = canonical.as_bytes().iter().copied().cycle().take(target_len).collect();
    debug_assert_eq!(bytes.len(), target_len);
    Fixture::new(bytes)
}
