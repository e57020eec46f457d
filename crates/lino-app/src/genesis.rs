// crates/lino-app/src/genesis.rs
//
// Genesis state, loaded from JSON:
//
//   {
//     "genesis_time": "2026-01-01T00:00:00Z",
//     "accounts":   [{"username": "alice", "balance": "1000"}],
//     "developers": [{"username": "app", "deposit": "100000"}],
//     "voters":     [{"username": "val-a", "deposit": "300000", "validator": true}]
//   }
//
// Voter deposits and developer deposits are debited from the genesis
// balances, so total supply is exactly the sum of `accounts[].balance`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lino_core::{AccountKey, LinoError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisAccount {
    pub username: AccountKey,
    /// Decimal LNO.
    pub balance: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisDeveloper {
    pub username: AccountKey,
    pub deposit: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisVoter {
    pub username: AccountKey,
    pub deposit: String,
    /// Also register as a validator, on call from the first block.
    #[serde(default)]
    pub validator: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genesis {
    pub genesis_time: DateTime<Utc>,
    #[serde(default)]
    pub accounts: Vec<GenesisAccount>,
    #[serde(default)]
    pub developers: Vec<GenesisDeveloper>,
    #[serde(default)]
    pub voters: Vec<GenesisVoter>,
}

impl Genesis {
    pub fn from_json(json: &str) -> Result<Self, LinoError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &str) -> Result<Self, LinoError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| LinoError::Storage(format!("cannot read genesis {}: {}", path, e)))?;
        Self::from_json(&contents)
    }
}
