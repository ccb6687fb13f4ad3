//! FNV-1a 64-bit, used for save checksums and scramble seeds.
//!
//! A stable, dependency-free hash: the same bytes produce the same digest
//! on every platform and every run, which `DefaultHasher` does not promise.

/// Hash `bytes` with FNV-1a 64.
pub(crate) fn fnv1a64(bytes: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    let mut hash = OFFSET_BASIS;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}
