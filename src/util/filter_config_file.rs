use std::path::Path;
use config::{Config, File, FileFormat};
use serde::Deserialize;
use log::debug;
use crate::FilterError;
use crate::util::{check_base_lg, FilterOptions};

/// On-disk overrides for [`FilterOptions`]. Every field is optional.
#[derive(Debug, Deserialize, Default)]
pub struct FilterConfigFile {
    pub bits_per_key: Option<i32>,
    pub base_lg: Option<u8>,
}

/// Loads `filter.yaml`, `filter.json` or `filter.ini` from `dir`, first one
/// found wins. A directory without any of them yields the defaults.
pub fn load_filter_config(dir: &Path) -> Result<FilterOptions, FilterError> {
    let mut cfg = Config::builder();

    let candidates = [
        ("filter.yaml", FileFormat::Yaml),
        ("filter.json", FileFormat::Json),
        ("filter.ini", FileFormat::Ini),
    ];
    let mut found = None;
    for (name, format) in candidates {
        let path = dir.join(name);
        if path.try_exists()? {
            found = Some((path, format));
            break;
        }
    }

    if let Some((path, format)) = found {
        debug!("loading filter config from {}", path.display());
        let name = path.to_str().ok_or_else(|| {
            FilterError::InvalidArgument(format!("non utf-8 config path: {}", path.display()))
        })?;
        cfg = cfg.add_source(File::new(name, format));
    }

    let file: FilterConfigFile = cfg.build()?.try_deserialize()?;
    file.to_filter_options()
}

impl FilterConfigFile {
    pub fn to_filter_options(self) -> Result<FilterOptions, FilterError> {
        let mut opts = FilterOptions::default();

        if let Some(v) = self.bits_per_key {
            opts.bits_per_key = v;
        }
        if let Some(v) = self.base_lg {
            check_base_lg(v)?;
            opts.base_lg = v;
        }

        Ok(opts)
    }
}
