use std::sync::Arc;
use bytes::{BufMut, BytesMut};
use log::{debug, trace};
use crate::filter::{hash, Filter, Generator};
use crate::util::{BLOOM_FILTER_NAME, MAX_PROBES, MIN_FILTER_BITS};

/// Bloom filter policy, byte compatible with LevelDB's builtin bloom filter.
///
/// Encoded filter: `[bit array: N bytes][k: 1 byte]` with `N >= 8`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BloomFilter {
    // Number of probes per key, in 1..=MAX_PROBES.
    k: u8,
    bits_per_key: usize,
}

impl BloomFilter {
    pub fn new(bits_per_key: i32) -> Self {
        let bits_per_key = usize::try_from(bits_per_key).unwrap_or_else(|_| {
            debug!("bloom filter: negative bits_per_key {} treated as 0", bits_per_key);
            0
        });

        // k ~ ln2 * bits_per_key, rounded down to save a little probing.
        let k = (bits_per_key.saturating_mul(69) / 100).clamp(1, MAX_PROBES as usize) as u8;
        debug!("bloom filter: bits_per_key={} k={}", bits_per_key, k);

        Self { k, bits_per_key }
    }

    pub fn k(&self) -> u8 {
        self.k
    }

    pub fn bits_per_key(&self) -> usize {
        self.bits_per_key
    }

    pub fn generator(&self) -> BloomGenerator {
        BloomGenerator {
            k: self.k,
            bits_per_key: self.bits_per_key,
            hashes: Vec::new(),
        }
    }
}

/// Shared bloom filter handle, the form table builders and readers hold.
pub fn new_bloom_filter(bits_per_key: i32) -> Arc<dyn Filter> {
    Arc::new(BloomFilter::new(bits_per_key))
}

impl Filter for BloomFilter {
    fn name(&self) -> &'static str {
        BLOOM_FILTER_NAME
    }

    fn append(&self, buf: &mut BytesMut, keys: &[&[u8]]) {
        let mut generator = BloomGenerator {
            k: self.k,
            bits_per_key: self.bits_per_key,
            hashes: Vec::with_capacity(keys.len()),
        };
        for key in keys {
            generator.add(key);
        }
        generator.append(buf);
    }

    fn contains(&self, data: &[u8], key: &[u8]) -> bool {
        // Zero or one byte only comes from a batch without keys.
        let Some((&k, array)) = data.split_last() else {
            return false;
        };
        if array.is_empty() {
            return false;
        }
        if k > MAX_PROBES {
            // Reserved for new encodings of short bloom filters. Consider it a match.
            return true;
        }

        let bits = array.len() * 8;
        let mut h = hash(key);
        let delta = h.rotate_right(17);
        for _ in 0..k {
            let pos = h as usize % bits;
            if array[pos / 8] & (1u8 << (pos % 8)) == 0 {
                return false;
            }
            h = h.wrapping_add(delta);
        }
        true
    }

    fn new_generator(&self) -> Box<dyn Generator> {
        Box::new(self.generator())
    }
}

#[derive(Debug)]
pub struct BloomGenerator {
    k: u8,
    bits_per_key: usize,
    hashes: Vec<u32>,
}

impl BloomGenerator {
    /// Bit and byte size of the array for `n` keys.
    fn aligned_size(&self, n: usize) -> (usize, usize) {
        let bits = self.bits_per_key.saturating_mul(n);
        if bits < MIN_FILTER_BITS {
            return (MIN_FILTER_BITS, MIN_FILTER_BITS / 8);
        }
        let bytes = bits.div_ceil(8);
        (bytes * 8, bytes)
    }
}

impl Generator for BloomGenerator {
    fn name(&self) -> &'static str {
        BLOOM_FILTER_NAME
    }

    fn add(&mut self, key: &[u8]) {
        self.hashes.push(hash(key));
    }

    fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    fn reset(&mut self) {
        self.hashes.clear();
    }

    fn append(&mut self, buf: &mut BytesMut) {
        let n = self.hashes.len();
        if n == 0 {
            return;
        }

        let (bits, bytes) = self.aligned_size(n);
        buf.reserve(bytes + 1);

        let start = buf.len();
        buf.resize(start + bytes, 0);
        let array = &mut buf[start..];
        for &key_hash in &self.hashes {
            // Double hashing: k probes from one hash.
            let mut h = key_hash;
            let delta = h.rotate_right(17);
            for _ in 0..self.k {
                let pos = h as usize % bits;
                array[pos / 8] |= 1u8 << (pos % 8);
                h = h.wrapping_add(delta);
            }
        }
        buf.put_u8(self.k);

        trace!("bloom filter: {} keys into {} bytes, k={}", n, bytes + 1, self.k);
        self.reset();
    }
}
