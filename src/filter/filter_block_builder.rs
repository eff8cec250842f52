use std::sync::Arc;
use bytes::{BufMut, Bytes, BytesMut};
use log::trace;
use crate::FilterError;
use crate::filter::{Filter, Generator};
use crate::util::coding::encode_fixed32;
use crate::util::{check_base_lg, FILTER_BASE_LG};

/// FilterBlockBuilder builds one filter per `2^base_lg` bytes of data block
/// offsets and lays them out as the SSTable filter block:
///
/// ```text
/// [filter 0] ... [filter n-1]
/// [offset of filter 0: fixed32] ... [offset of filter n-1: fixed32]
/// [offset of offset array: fixed32]
/// [base_lg: u8]
/// ```
///
/// Call sequence: (start_block add_key*)* finish
pub struct FilterBlockBuilder {
    policy: Arc<dyn Filter>,
    generator: Box<dyn Generator>,
    base_lg: u8,
    result: BytesMut,          // Filter data computed so far
    filter_offsets: Vec<u32>,  // Offset of each filter in result
}

impl FilterBlockBuilder {
    pub fn new(policy: Arc<dyn Filter>) -> Self {
        Self::build(policy, FILTER_BASE_LG)
    }

    /// `base_lg` must be in `MIN_BASE_LG..=MAX_BASE_LG`.
    pub fn with_base_lg(policy: Arc<dyn Filter>, base_lg: u8) -> Result<Self, FilterError> {
        check_base_lg(base_lg)?;
        Ok(Self::build(policy, base_lg))
    }

    fn build(policy: Arc<dyn Filter>, base_lg: u8) -> Self {
        let generator = policy.new_generator();
        Self {
            policy,
            generator,
            base_lg,
            result: BytesMut::new(),
            filter_offsets: Vec::new(),
        }
    }

    pub fn policy(&self) -> &Arc<dyn Filter> {
        &self.policy
    }

    /// Mark the start of a data block at file offset `block_offset`.
    /// Offsets must be non-decreasing.
    pub fn start_block(&mut self, block_offset: u64) {
        let filter_index = block_offset >> self.base_lg;
        debug_assert!(filter_index >= self.filter_offsets.len() as u64);
        while filter_index > self.filter_offsets.len() as u64 {
            self.generate_filter();
        }
    }

    pub fn add_key(&mut self, key: &[u8]) {
        self.generator.add(key);
    }

    /// Finish the filter block and return its bytes. The builder is empty
    /// afterwards and can be used for the next table.
    pub fn finish(&mut self) -> Bytes {
        if !self.generator.is_empty() {
            self.generate_filter();
        }

        let array_offset = self.result.len() as u32;
        for &off in &self.filter_offsets {
            self.result.extend_from_slice(&encode_fixed32(off));
        }
        self.result.extend_from_slice(&encode_fixed32(array_offset));
        self.result.put_u8(self.base_lg);

        trace!(
            "filter block: {} filters, {} bytes",
            self.filter_offsets.len(),
            self.result.len()
        );
        self.filter_offsets.clear();
        self.result.split().freeze()
    }

    /// Close the current filter. A filter without keys is zero bytes long.
    fn generate_filter(&mut self) {
        self.filter_offsets.push(self.result.len() as u32);
        self.generator.append(&mut self.result);
    }
}
