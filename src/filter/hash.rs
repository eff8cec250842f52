const SEED: u32 = 0xbc9f1d34;

/// Hash used by bloom filters. Writers and readers must agree on it.
#[inline]
pub fn hash(data: &[u8]) -> u32 {
    hash_with_seed(data, SEED)
}

/// Murmur-like 32-bit hash, bit-compatible with LevelDB's `Hash`.
pub fn hash_with_seed(data: &[u8], seed: u32) -> u32 {
    const M: u32 = 0xc6a4a793;
    const R: u32 = 24;

    let mut h = seed ^ (data.len() as u32).wrapping_mul(M);

    let mut words = data.chunks_exact(4);
    for w in &mut words {
        h = h.wrapping_add(u32::from_le_bytes([w[0], w[1], w[2], w[3]]));
        h = h.wrapping_mul(M);
        h ^= h >> 16;
    }

    let rest = words.remainder();
    if rest.len() == 3 {
        h = h.wrapping_add((rest[2] as u32) << 16);
    }
    if rest.len() >= 2 {
        h = h.wrapping_add((rest[1] as u32) << 8);
    }
    if !rest.is_empty() {
        h = h.wrapping_add(rest[0] as u32);
        h = h.wrapping_mul(M);
        h ^= h >> R;
    }
    h
}
