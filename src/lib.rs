pub mod filter;
pub mod util;
pub mod error;

pub use crate::error::FilterError;
pub use crate::filter::{new_bloom_filter, BloomFilter, BloomGenerator, Filter, FilterBlockBuilder, FilterBlockReader, Generator};
pub use crate::util::{load_filter_config, FilterOptions};
