use thiserror::Error;

use crate::key::{Address, Identity};

/// Coarse classification surfaced to whoever submitted the transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    AlreadyExists,
    NotFound,
    Unauthorized,
    InvalidInput,
    Internal,
}

#[derive(Debug, Error)]
pub enum FavoritesError {
    #[error("favorites already initialized at {address}")]
    AlreadyExists { address: Address },

    #[error("no favorites record at {address}")]
    NotFound { address: Address },

    #[error("unauthorized: record owned by {expected}, transition signed by {actual}")]
    Unauthorized { expected: Identity, actual: Identity },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("address derivation failed: {0}")]
    Derivation(#[from] DerivationError),

    #[error("corrupt account data: {0}")]
    Decode(#[from] DecodeError),

    #[error("account store: {0}")]
    Store(#[from] StoreError),
}

impl FavoritesError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::Derivation(_) | Self::Decode(_) | Self::Store(_) => ErrorKind::Internal,
        }
    }
}

/// Fatal configuration errors from the address deriver. Never retryable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DerivationError {
    #[error("seed of {len} bytes exceeds the address space limit of {max}")]
    SeedTooLong { len: usize, max: usize },

    #[error("no usable bump among {tried} candidates")]
    Exhausted { tried: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("account data too short: {len} bytes")]
    TooShort { len: usize },

    #[error("discriminator mismatch")]
    Discriminator,

    #[error("malformed record body: {0}")]
    Body(String),

    #[error("color is {len} bytes, max {max}")]
    ColorTooLong { len: usize, max: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("account {address} already in use")]
    AccountInUse { address: Address },

    #[error("account {address} does not exist")]
    AccountMissing { address: Address },

    #[error("account {address} changed since it was read")]
    Conflict { address: Address },

    #[error("lock poisoned")]
    LockPoisoned,
}

pub type Result<T, E = FavoritesError> = core::result::Result<T, E>;
