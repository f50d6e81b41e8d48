//! Wallet file persistence
//!
//! Found keypairs are written as JSON next to the working directory, one
//! file per wallet: `vanity-wallet-<unix-secs>.json`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use solvanity_core::{Keypair, PatternSpec};

const WALLET_PREFIX: &str = "vanity-wallet-";

#[derive(Debug, Serialize, Deserialize)]
pub struct WalletFile {
    /// Base58 address
    pub public_key: String,
    /// Base58 of the 64-byte keypair (seed || pubkey), the form wallets import
    pub secret_key: String,
    pub search_patterns: SearchPatterns,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchPatterns {
    pub prefix: String,
    pub suffix: String,
}

impl WalletFile {
    pub fn new(keypair: &Keypair, spec: &PatternSpec) -> Self {
        Self {
            public_key: keypair.address(),
            secret_key: keypair.secret_base58(),
            search_patterns: SearchPatterns {
                prefix: spec.prefix.clone(),
                suffix: spec.suffix.clone(),
            },
        }
    }
}

/// Default output path for a freshly found wallet.
pub fn default_wallet_path() -> PathBuf {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    PathBuf::from(format!("{WALLET_PREFIX}{secs}.json"))
}

pub fn save_wallet(path: &Path, keypair: &Keypair, spec: &PatternSpec) -> Result<()> {
    let wallet = WalletFile::new(keypair, spec);
    let json = serde_json::to_string_pretty(&wallet)?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Collect the wallet files in a directory, sorted by filename. Files that
/// fail to parse are logged and skipped.
pub fn list_wallets(dir: &Path) -> Result<Vec<(PathBuf, WalletFile)>> {
    let mut wallets = Vec::new();
    let entries =
        fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))?;

    for entry in entries {
        let path = entry?.path();
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => continue,
        };
        if !name.starts_with(WALLET_PREFIX) || !name.ends_with(".json") {
            continue;
        }
        let contents = fs::read_to_string(&path)?;
        match serde_json::from_str::<WalletFile>(&contents) {
            Ok(wallet) => wallets.push((path, wallet)),
            Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable wallet file"),
        }
    }

    wallets.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(wallets)
}
