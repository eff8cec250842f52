pub(crate) mod hash;
mod bloom;
mod filter_block_builder;
mod filter_block;

use bytes::BytesMut;

pub use bloom::{new_bloom_filter, BloomFilter, BloomGenerator};
pub use filter_block::FilterBlockReader;
pub use filter_block_builder::FilterBlockBuilder;
pub use hash::{hash, hash_with_seed};

/// A filter algorithm: builds filter data from keys and answers membership
/// queries against previously built data.
///
/// Implementations are immutable and may be shared between threads.
pub trait Filter: Send + Sync {
    /// Name persisted alongside filter data so readers pick a matching
    /// decoder. Changing it breaks existing tables.
    fn name(&self) -> &'static str;

    /// Appends filter data for `keys` to `buf`. Writes nothing if `keys` is empty.
    fn append(&self, buf: &mut BytesMut, keys: &[&[u8]]);

    /// Reports whether `key` may be in the set `data` was built from.
    /// False positives are allowed, false negatives are not.
    fn contains(&self, data: &[u8], key: &[u8]) -> bool;

    fn new_generator(&self) -> Box<dyn Generator>;
}

/// Accumulates keys of one batch and serializes them as filter data.
///
/// A generator is single-writer; reuse it across batches to keep its buffers.
pub trait Generator: Send {
    fn name(&self) -> &'static str;

    fn add(&mut self, key: &[u8]);

    fn is_empty(&self) -> bool;

    fn reset(&mut self);

    /// Appends filter data for the keys added since the last reset, then
    /// resets. Writes nothing if no key was added.
    fn append(&mut self, buf: &mut BytesMut);
}
