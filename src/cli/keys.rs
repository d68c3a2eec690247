//! Key listing command.

use crate::cli::common::{print_json, CliResult};
use crate::keyboard::{KeyInfo, KeyRegistry};
use crate::models::KeyId;
use clap::Args;
use serde::Serialize;

/// List the keys of the virtual keyboard
#[derive(Debug, Clone, Args)]
pub struct KeysArgs {
    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Key list response
#[derive(Debug, Clone, Serialize)]
pub struct KeyListResponse {
    /// Distinct keys in first-appearance order
    pub keys: Vec<KeyInfo>,
    /// Visual rows, including repeated caps
    pub rows: Vec<Vec<KeyId>>,
    /// Number of distinct keys
    pub count: usize,
}

impl KeysArgs {
    /// Execute the keys command
    pub fn execute(&self) -> CliResult<()> {
        let registry = KeyRegistry::standard();
        let response = KeyListResponse {
            keys: registry
                .all_keys()
                .iter()
                .filter_map(|key| registry.info(*key))
                .collect(),
            rows: registry.rows().to_vec(),
            count: registry.len(),
        };

        if self.json {
            return print_json(&response);
        }

        println!("Keys ({}):\n", response.count);
        for (index, row) in response.rows.iter().enumerate() {
            let labels: Vec<&str> = row.iter().map(|key| key.as_str()).collect();
            println!("  Row {}: {}", index + 1, labels.join(" "));
        }
        Ok(())
    }
}
