use std::sync::Arc;
use bytes::Bytes;
use log::warn;
use crate::FilterError;
use crate::filter::Filter;
use crate::util::check_base_lg;
use crate::util::coding::decode_fixed32;

/// Reader side of the filter block written by `FilterBlockBuilder`.
pub struct FilterBlockReader {
    policy: Arc<dyn Filter>,
    data: Bytes,
    offset_start: usize, // Beginning of offset array
    num: usize,          // Number of filters
    base_lg: u8,
}

impl FilterBlockReader {
    pub fn new(policy: Arc<dyn Filter>, data: Bytes) -> Result<Self, FilterError> {
        let n = data.len();
        if n < 5 {
            warn!("filter block too small: {} bytes", n);
            return Err(FilterError::Corruption("filter block too small".into()));
        }

        let base_lg = data[n - 1];
        if check_base_lg(base_lg).is_err() {
            warn!("filter block has bad base_lg {}", base_lg);
            return Err(FilterError::Corruption(format!("bad filter base_lg {}", base_lg)));
        }

        let offset_start = decode_fixed32(&data[n - 5..])
            .ok_or_else(|| FilterError::Corruption("bad filter offset array".into()))?
            as usize;
        if offset_start > n - 5 {
            warn!("filter offset array starts at {} past block end {}", offset_start, n - 5);
            return Err(FilterError::Corruption("bad filter offset array".into()));
        }

        Ok(Self {
            policy,
            num: (n - 5 - offset_start) / 4,
            data,
            offset_start,
            base_lg,
        })
    }

    pub fn num_filters(&self) -> usize {
        self.num
    }

    /// Filter covering the data block at `block_offset`, or None if the block
    /// has no usable filter. An empty slice means the batch had no keys.
    pub fn filter_for_block(&self, block_offset: u64) -> Option<&[u8]> {
        let index = usize::try_from(block_offset >> self.base_lg).ok()?;
        if index >= self.num {
            return None;
        }

        // For the last filter the limit is the offset array start itself.
        let pos = self.offset_start + index * 4;
        let start = decode_fixed32(&self.data[pos..])? as usize;
        let limit = decode_fixed32(&self.data[pos + 4..])? as usize;
        if start <= limit && limit <= self.offset_start {
            Some(&self.data[start..limit])
        } else {
            None
        }
    }

    /// False only if the key is definitely absent from the data block.
    pub fn key_may_match(&self, block_offset: u64, key: &[u8]) -> bool {
        match self.filter_for_block(block_offset) {
            Some(filter) => self.policy.contains(filter, key),
            // Missing or inconsistent filter, the block has to be read.
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{new_bloom_filter, FilterBlockBuilder};

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn test_empty_builder() {
        init_logger();
        let policy = new_bloom_filter(10);
        let mut builder = FilterBlockBuilder::new(policy.clone());
        let block = builder.finish();
        assert_eq!(&block[..], &[0, 0, 0, 0, 11]);

        let reader = FilterBlockReader::new(policy, block).unwrap();
        assert_eq!(reader.num_filters(), 0);
        assert!(reader.key_may_match(0, b"foo"));
        assert!(reader.key_may_match(100_000, b"foo"));
    }

    #[test]
    fn test_single_chunk() {
        init_logger();
        let policy = new_bloom_filter(10);
        let mut builder = FilterBlockBuilder::new(policy.clone());
        builder.start_block(100);
        builder.add_key(b"foo");
        builder.add_key(b"bar");
        builder.add_key(b"box");
        builder.start_block(200);
        builder.add_key(b"box");
        builder.start_block(300);
        builder.add_key(b"hello");
        let block = builder.finish();

        let reader = FilterBlockReader::new(policy, block).unwrap();
        assert_eq!(reader.num_filters(), 1);
        assert!(reader.key_may_match(100, b"foo"));
        assert!(reader.key_may_match(100, b"bar"));
        assert!(reader.key_may_match(100, b"box"));
        assert!(reader.key_may_match(100, b"hello"));
        assert!(reader.key_may_match(100, b"foo"));
        assert!(!reader.key_may_match(100, b"missing"));
        assert!(!reader.key_may_match(100, b"other"));
    }

    #[test]
    fn test_multi_chunk() {
        init_logger();
        let policy = new_bloom_filter(10);
        let mut builder = FilterBlockBuilder::new(policy.clone());

        // First filter
        builder.start_block(0);
        builder.add_key(b"foo");
        builder.start_block(2000);
        builder.add_key(b"bar");

        // Second filter
        builder.start_block(3100);
        builder.add_key(b"box");

        // Third and fourth filters are empty

        // Last filter
        builder.start_block(9000);
        builder.add_key(b"box");
        builder.add_key(b"hello");

        let block = builder.finish();
        let reader = FilterBlockReader::new(policy, block).unwrap();
        assert_eq!(reader.num_filters(), 5);

        // Check first filter
        assert!(reader.key_may_match(0, b"foo"));
        assert!(reader.key_may_match(2000, b"bar"));
        assert!(!reader.key_may_match(0, b"box"));
        assert!(!reader.key_may_match(0, b"hello"));

        // Check second filter
        assert!(reader.key_may_match(3100, b"box"));
        assert!(!reader.key_may_match(3100, b"foo"));
        assert!(!reader.key_may_match(3100, b"bar"));
        assert!(!reader.key_may_match(3100, b"hello"));

        // Check third filter (empty)
        assert_eq!(reader.filter_for_block(4100), Some(&[][..]));
        assert!(!reader.key_may_match(4100, b"foo"));
        assert!(!reader.key_may_match(4100, b"bar"));
        assert!(!reader.key_may_match(4100, b"box"));
        assert!(!reader.key_may_match(4100, b"hello"));

        // Check last filter
        assert!(reader.key_may_match(9000, b"box"));
        assert!(reader.key_may_match(9000, b"hello"));
        assert!(!reader.key_may_match(9000, b"foo"));
        assert!(!reader.key_may_match(9000, b"bar"));

        // Past the last filter nothing is known
        assert_eq!(reader.filter_for_block(20_000), None);
        assert!(reader.key_may_match(20_000, b"anything"));
    }

    #[test]
    fn test_filter_sizes_in_block() {
        let policy = new_bloom_filter(10);
        let mut builder = FilterBlockBuilder::new(policy.clone());
        builder.start_block(0);
        builder.add_key(b"foo");
        builder.start_block(4096);
        builder.add_key(b"bar");
        let block = builder.finish();

        // Two 9 byte filters, an empty one between them, 3 offsets, array start, base_lg.
        assert_eq!(block.len(), 9 + 9 + 3 * 4 + 4 + 1);
        let reader = FilterBlockReader::new(policy, block).unwrap();
        assert_eq!(reader.filter_for_block(0).map(|f| f.len()), Some(9));
        assert_eq!(reader.filter_for_block(2048).map(|f| f.len()), Some(0));
        assert_eq!(reader.filter_for_block(4096).map(|f| f.len()), Some(9));
    }

    #[test]
    fn test_builder_reused_after_finish() {
        let policy = new_bloom_filter(10);
        let mut builder = FilterBlockBuilder::new(policy.clone());
        builder.start_block(0);
        builder.add_key(b"foo");
        let first = builder.finish();
        assert!(first.len() > 5);

        let second = builder.finish();
        assert_eq!(&second[..], &[0, 0, 0, 0, 11]);
        assert!(builder.policy().contains(&first[..9], b"foo"));
    }

    #[test]
    fn test_custom_base_lg() {
        let policy = new_bloom_filter(10);
        let mut builder = FilterBlockBuilder::with_base_lg(policy.clone(), 4).unwrap();
        builder.start_block(0);
        builder.add_key(b"foo");
        builder.start_block(16);
        builder.add_key(b"bar");
        let block = builder.finish();
        assert_eq!(block[block.len() - 1], 4);

        let reader = FilterBlockReader::new(policy, block).unwrap();
        assert_eq!(reader.num_filters(), 2);
        assert!(reader.key_may_match(0, b"foo"));
        assert!(reader.key_may_match(16, b"bar"));
    }

    #[test]
    fn test_corrupt_blocks_rejected() {
        let policy = new_bloom_filter(10);

        let too_small = Bytes::from_static(&[0, 0, 0, 11]);
        assert!(matches!(
            FilterBlockReader::new(policy.clone(), too_small),
            Err(FilterError::Corruption(_))
        ));

        // Offset array claimed to start past the end.
        let bad_start = Bytes::from_static(&[1, 2, 3, 0xff, 0, 0, 0, 11]);
        assert!(matches!(
            FilterBlockReader::new(policy.clone(), bad_start),
            Err(FilterError::Corruption(_))
        ));

        for base_lg in [0u8, 31, 64, 255] {
            let bad_base_lg = Bytes::copy_from_slice(&[0, 0, 0, 0, base_lg]);
            assert!(matches!(
                FilterBlockReader::new(policy.clone(), bad_base_lg),
                Err(FilterError::Corruption(_))
            ));
        }
    }

    #[test]
    fn test_builder_rejects_out_of_range_base_lg() {
        let policy = new_bloom_filter(10);
        for base_lg in [0u8, 31, 64, 255] {
            assert!(matches!(
                FilterBlockBuilder::with_base_lg(policy.clone(), base_lg),
                Err(FilterError::InvalidArgument(_))
            ));
        }

        let mut builder = FilterBlockBuilder::with_base_lg(policy.clone(), 30).unwrap();
        builder.start_block(0);
        builder.add_key(b"foo");
        builder.start_block(1 << 30);
        builder.add_key(b"bar");
        let block = builder.finish();
        assert_eq!(block[block.len() - 1], 30);

        let reader = FilterBlockReader::new(policy, block).unwrap();
        assert_eq!(reader.num_filters(), 2);
        assert!(reader.key_may_match(1 << 30, b"bar"));
    }

    #[test]
    fn test_inconsistent_offsets_match_everything() {
        let policy = new_bloom_filter(10);
        // One filter whose offset (3) lies past the array start (2).
        let data = Bytes::from_static(&[0xff, 0xff, 3, 0, 0, 0, 2, 0, 0, 0, 11]);
        let reader = FilterBlockReader::new(policy, data).unwrap();
        assert_eq!(reader.num_filters(), 1);
        assert_eq!(reader.filter_for_block(0), None);
        assert!(reader.key_may_match(0, b"foo"));
    }
}
