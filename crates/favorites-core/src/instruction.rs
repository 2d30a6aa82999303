//! Transitions as submitted to the ledger.
//!
//! Instruction data follows the Anchor convention: an 8-byte method
//! discriminator, then the borsh-encoded arguments.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::key::{Address, Identity};
use crate::record::{FieldUpdate, Record};

/// sha256("global:set_favorites")[..8]
pub const SET_FAVORITES_DISCRIMINATOR: [u8; 8] = [211, 137, 87, 135, 161, 224, 187, 120];
/// sha256("global:update_favorites")[..8]
pub const UPDATE_FAVORITES_DISCRIMINATOR: [u8; 8] = [138, 31, 158, 61, 111, 33, 209, 79];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Transition {
    Create {
        owner: Identity,
        number: u64,
        color: String,
    },
    Update {
        owner: Identity,
        #[serde(default)]
        number: FieldUpdate<u64>,
        #[serde(default)]
        color: FieldUpdate<String>,
    },
}

impl Transition {
    pub fn owner(&self) -> &Identity {
        match self {
            Self::Create { owner, .. } | Self::Update { owner, .. } => owner,
        }
    }

    /// Instruction name as exposed by the program.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Create { .. } => "set_favorites",
            Self::Update { .. } => "update_favorites",
        }
    }

    /// Anchor instruction data: discriminator, then the borsh-encoded arguments.
    pub fn instruction_data(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(8 + 16 + 4 + 64);
        match self {
            Self::Create { number, color, .. } => {
                data.extend_from_slice(&SET_FAVORITES_DISCRIMINATOR);
                data.extend_from_slice(&number.to_le_bytes());
                put_string(&mut data, color);
            }
            Self::Update { number, color, .. } => {
                data.extend_from_slice(&UPDATE_FAVORITES_DISCRIMINATOR);
                match number {
                    FieldUpdate::Keep => data.push(0),
                    FieldUpdate::SetTo(n) => {
                        data.push(1);
                        data.extend_from_slice(&n.to_le_bytes());
                    }
                }
                match color {
                    FieldUpdate::Keep => data.push(0),
                    FieldUpdate::SetTo(c) => {
                        data.push(1);
                        put_string(&mut data, c);
                    }
                }
            }
        }
        data
    }
}

fn put_string(out: &mut Vec<u8>, s: &str) {
    out.extend_from_slice(&(s.len() as u32).to_le_bytes());
    out.extend_from_slice(s.as_bytes());
}

/// Identifies one submission: SHA-256 over the instruction data, the signer
/// and the account bytes it was applied to.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TransitionId(#[serde(with = "hex")] [u8; 32]);

impl TransitionId {
    pub fn compute(instruction_data: &[u8], authority: &Identity, prior: Option<&[u8]>) -> Self {
        let mut h = Sha256::new();
        h.update(instruction_data);
        h.update(authority.as_ref());
        match prior {
            Some(bytes) => {
                h.update([1u8]);
                h.update(bytes);
            }
            None => h.update([0u8]),
        }
        Self(h.finalize().into())
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.0
    }
}

impl core::fmt::Display for TransitionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl core::fmt::Debug for TransitionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "TransitionId({self})")
    }
}

/// Outcome of a committed transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionReceipt {
    pub id: TransitionId,
    pub address: Address,
    pub record: Record,
}
