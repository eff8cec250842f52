/// Persisted next to every bloom filter block; readers pick the decoder by it.
pub const BLOOM_FILTER_NAME: &str = "leveldb.BuiltinBloomFilter2";

/// Largest probe count a bloom filter is built with. Trailing bytes above
/// this are reserved for other encodings.
pub const MAX_PROBES: u8 = 30;

/// Smallest bit array emitted for a non-empty batch.
pub const MIN_FILTER_BITS: usize = 64;

pub const DEFAULT_BITS_PER_KEY: i32 = 10;

/// One filter per 2KB of data block offsets.
pub const FILTER_BASE_LG: u8 = 11;

/// Valid range of `base_lg` for filter blocks.
pub const MIN_BASE_LG: u8 = 1;
pub const MAX_BASE_LG: u8 = 30;
