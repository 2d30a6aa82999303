//! Runtime configuration for the deriver and the state machine.
//!
//! Every field has a default matching the deployed program, so an empty JSON
//! object is a valid config.

use serde::{Deserialize, Serialize};

use crate::error::FavoritesError;
use crate::key::Address;
use crate::record::MAX_COLOR_LEN;
use crate::{FAVORITES_PROGRAM_ID, MAX_SEED_LEN, NAMESPACE_TAG};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FavoritesConfig {
    /// Program that owns every derived address.
    pub program_id: Address,
    /// First derivation seed.
    pub namespace_tag: String,
    /// Upper bound on `color`, in bytes. Cannot exceed the on-chain allocation.
    pub max_color_len: usize,
}

impl Default for FavoritesConfig {
    fn default() -> Self {
        Self {
            program_id: FAVORITES_PROGRAM_ID,
            namespace_tag: String::from_utf8_lossy(NAMESPACE_TAG).into_owned(),
            max_color_len: MAX_COLOR_LEN,
        }
    }
}

impl FavoritesConfig {
    pub fn validate(&self) -> Result<(), FavoritesError> {
        if self.namespace_tag.is_empty() || self.namespace_tag.len() > MAX_SEED_LEN {
            return Err(FavoritesError::InvalidInput(format!(
                "namespace_tag must be 1..={MAX_SEED_LEN} bytes, got {}",
                self.namespace_tag.len()
            )));
        }
        if self.max_color_len > MAX_COLOR_LEN {
            return Err(FavoritesError::InvalidInput(format!(
                "max_color_len {} exceeds account capacity {MAX_COLOR_LEN}",
                self.max_color_len
            )));
        }
        Ok(())
    }

    pub fn namespace_bytes(&self) -> &[u8] {
        self.namespace_tag.as_bytes()
    }
}
