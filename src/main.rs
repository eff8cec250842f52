use std::collections::BTreeSet;
use std::path::PathBuf;
use std::{env, fs};

use anyhow::{bail, Context};
use bytes::BytesMut;
use log::info;

use kvfilter::{load_filter_config, FilterOptions};

const PROBES: usize = 10_000;

/// One key per line, LF or CRLF terminated. Empty lines are skipped and
/// duplicates collapse, so the count is the filter's real `n`.
fn parse_keys(content: &[u8]) -> Vec<&[u8]> {
    content
        .split(|&b| b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .filter(|line| !line.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let Some(keys_file) = args.next().map(PathBuf::from) else {
        bail!("usage: kvfilter <keys-file> [config-dir]");
    };
    let opts = match args.next() {
        Some(dir) => load_filter_config(&PathBuf::from(dir))?,
        None => FilterOptions::default(),
    };
    info!("filter options: {:?}", opts);

    let content = fs::read(&keys_file)
        .with_context(|| format!("read keys from {}", keys_file.display()))?;
    let keys = parse_keys(&content);

    let policy = opts.new_policy();
    let mut generator = policy.new_generator();
    for key in &keys {
        generator.add(key);
    }
    let mut data = BytesMut::new();
    generator.append(&mut data);

    println!("filter:       {}", policy.name());
    println!("keys:         {} distinct", keys.len());
    if data.is_empty() {
        println!("size:         0 bytes (no keys, no filter)");
        return Ok(());
    }

    let k = data[data.len() - 1];
    let m = (data.len() - 1) * 8;
    println!("size:         {} bytes ({} bits, k={})", data.len(), m, k);

    let missing = keys.iter().filter(|key| !policy.contains(&data, key)).count();
    if missing > 0 {
        bail!("{} keys not found in their own filter", missing);
    }

    // Random 16 byte probes are absent from a newline separated key file
    // with overwhelming probability.
    let mut false_positives = 0;
    for _ in 0..PROBES {
        let probe: [u8; 16] = rand::random();
        if policy.contains(&data, &probe) {
            false_positives += 1;
        }
    }
    let observed = false_positives as f64 / PROBES as f64;
    let expected = (1.0 - (-(k as f64) * keys.len() as f64 / m as f64).exp()).powi(k as i32);
    println!("fp rate:      {:.4} observed, {:.4} expected", observed, expected);

    Ok(())
}
