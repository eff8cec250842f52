use std::sync::Arc;
use crate::FilterError;
use crate::filter::{new_bloom_filter, Filter, FilterBlockBuilder};
use crate::util::{DEFAULT_BITS_PER_KEY, FILTER_BASE_LG, MAX_BASE_LG, MIN_BASE_LG};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOptions {
    /// Bloom filter space budget. Negative values are treated as 0.
    pub bits_per_key: i32,

    /// log2 of the data block offset range covered by one filter.
    pub base_lg: u8,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            bits_per_key: DEFAULT_BITS_PER_KEY,
            base_lg: FILTER_BASE_LG,
        }
    }
}

impl FilterOptions {
    pub fn new_policy(&self) -> Arc<dyn Filter> {
        new_bloom_filter(self.bits_per_key)
    }

    pub fn new_filter_block_builder(&self) -> Result<FilterBlockBuilder, FilterError> {
        FilterBlockBuilder::with_base_lg(self.new_policy(), self.base_lg)
    }
}

/// Rejects a `base_lg` outside `MIN_BASE_LG..=MAX_BASE_LG`.
pub fn check_base_lg(base_lg: u8) -> Result<(), FilterError> {
    if !(MIN_BASE_LG..=MAX_BASE_LG).contains(&base_lg) {
        return Err(FilterError::InvalidArgument(format!(
            "base_lg must be in {}..={}, got {}",
            MIN_BASE_LG, MAX_BASE_LG, base_lg
        )));
    }
    Ok(())
}
