pub(crate) mod constants;
pub(crate) mod coding;
mod filter_config_file;
mod options;

pub use constants::{BLOOM_FILTER_NAME, DEFAULT_BITS_PER_KEY, FILTER_BASE_LG, MAX_BASE_LG, MAX_PROBES, MIN_BASE_LG, MIN_FILTER_BITS};
pub use filter_config_file::{load_filter_config, FilterConfigFile};
pub use options::{check_base_lg, FilterOptions};
