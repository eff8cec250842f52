// Fixed-length little-endian helpers (LevelDB style).

#[inline]
pub fn encode_fixed32(v: u32) -> [u8; 4] {
    v.to_le_bytes()
}

/// Returns None if `src` is shorter than 4 bytes.
#[inline]
pub fn decode_fixed32(src: &[u8]) -> Option<u32> {
    let b: [u8; 4] = src.get(..4)?.try_into().ok()?;
    Some(u32::from_le_bytes(b))
}
