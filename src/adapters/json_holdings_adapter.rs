//! JSON file holdings store.
//!
//! File shape: `{"risk_asset_quantity": 0, "defensive_asset_quantity": 0, "cash": 300000.0}`

use crate::domain::error::VixboosterError;
use crate::domain::holdings::Holdings;
use crate::ports::holdings_port::HoldingsPort;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::info;

pub struct JsonHoldingsStore {
    path: PathBuf,
}

impl JsonHoldingsStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl HoldingsPort for JsonHoldingsStore {
    fn load(&self) -> Result<Option<Holdings>, VixboosterError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(VixboosterError::HoldingsStore {
                    reason: format!("failed to read {}: {}", self.path.display(), e),
                });
            }
        };

        let holdings: Holdings =
            serde_json::from_str(&content).map_err(|e| VixboosterError::HoldingsStore {
                reason: format!("malformed {}: {}", self.path.display(), e),
            })?;
        holdings.validate()?;
        Ok(Some(holdings))
    }

    fn save(&self, holdings: &Holdings) -> Result<(), VixboosterError> {
        holdings.validate()?;
        let content =
            serde_json::to_string_pretty(holdings).map_err(|e| VixboosterError::HoldingsStore {
                reason: format!("failed to encode holdings: {}", e),
            })?;

        // atomic replace
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content).map_err(|e| VixboosterError::HoldingsStore {
            reason: format!("failed to write {}: {}", tmp.display(), e),
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| VixboosterError::HoldingsStore {
            reason: format!("failed to replace {}: {}", self.path.display(), e),
        })?;

        info!(path = %self.path.display(), "holdings saved");
        Ok(())
    }
}
