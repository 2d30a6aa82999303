//! Favorites record schema and its account encoding.
//!
//! Layout (Anchor convention, borsh LE):
//! discriminator(8) | owner(32) | number u64(8) | color len u32(4) | color bytes(<= 50).
//! Accounts are allocated at ACCOUNT_SPACE, so anything after the color is padding.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, FavoritesError};
use crate::key::{Identity, KEY_LEN};

/// sha256("account:Favorites")[..8]
pub const RECORD_DISCRIMINATOR: [u8; 8] = [44, 205, 48, 25, 172, 96, 48, 27];
pub const DISC_SIZE: usize = 8;

/// Longest color the account can hold, in bytes.
pub const MAX_COLOR_LEN: usize = 50;

pub const RECORD_MAX_SIZE: usize = KEY_LEN + 8 + 4 + MAX_COLOR_LEN; // = 94
pub const ACCOUNT_SPACE: usize = DISC_SIZE + RECORD_MAX_SIZE; // = 102

#[derive(
    Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize,
)]
pub struct Record {
    pub owner: Identity,
    pub number: u64,
    pub color: String,
}

impl Record {
    /// Account bytes: discriminator followed by the borsh body.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(DISC_SIZE + KEY_LEN + 12 + self.color.len());
        out.extend_from_slice(&RECORD_DISCRIMINATOR);
        out.extend_from_slice(self.owner.as_ref());
        out.extend_from_slice(&self.number.to_le_bytes());
        out.extend_from_slice(&(self.color.len() as u32).to_le_bytes());
        out.extend_from_slice(self.color.as_bytes());
        out
    }

    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        if data.len() < DISC_SIZE {
            return Err(DecodeError::TooShort { len: data.len() });
        }
        if data[..DISC_SIZE] != RECORD_DISCRIMINATOR {
            return Err(DecodeError::Discriminator);
        }
        // Deserialize from a moving slice so trailing padding is ignored.
        let mut body = &data[DISC_SIZE..];
        let record = <Self as BorshDeserialize>::deserialize(&mut body)
            .map_err(|e| DecodeError::Body(e.to_string()))?;
        if record.color.len() > MAX_COLOR_LEN {
            let len = record.color.len();
            return Err(DecodeError::ColorTooLong { len, max: MAX_COLOR_LEN });
        }
        Ok(record)
    }
}

/// Rejects colors longer than `max` bytes. Never truncates.
pub fn validate_color(color: &str, max: usize) -> Result<(), FavoritesError> {
    if color.len() > max {
        return Err(FavoritesError::InvalidInput(format!(
            "color is {} bytes, max {max}",
            color.len()
        )));
    }
    Ok(())
}

/// Per-field update: leave the committed value alone, or replace it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldUpdate<T> {
    #[default]
    Keep,
    SetTo(T),
}

impl<T> FieldUpdate<T> {
    pub fn is_keep(&self) -> bool {
        matches!(self, Self::Keep)
    }

    /// Writes the new value into `slot`; returns whether anything changed.
    pub fn apply_to(self, slot: &mut T) -> bool
    where
        T: PartialEq,
    {
        match self {
            Self::Keep => false,
            Self::SetTo(v) => {
                let changed = *slot != v;
                *slot = v;
                changed
            }
        }
    }

    pub fn into_option(self) -> Option<T> {
        self.into()
    }
}

impl<T> From<Option<T>> for FieldUpdate<T> {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => Self::SetTo(v),
            None => Self::Keep,
        }
    }
}

impl<T> From<FieldUpdate<T>> for Option<T> {
    fn from(v: FieldUpdate<T>) -> Self {
        match v {
            FieldUpdate::Keep => None,
            FieldUpdate::SetTo(v) => Some(v),
        }
    }
}
