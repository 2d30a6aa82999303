//! 32-byte ledger keys.
//!
//! Identity: who signs and owns a record. Address: where a record lives.
//! Both print and serialize as lowercase hex; base58 is left to the Solana layer.

use core::fmt;
use core::str::FromStr;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

pub const KEY_LEN: usize = 32;

macro_rules! key_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default,
            BorshSerialize, BorshDeserialize, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(#[serde(with = "hex")] [u8; KEY_LEN]);

        impl $name {
            pub const fn new(bytes: [u8; KEY_LEN]) -> Self { Self(bytes) }
            pub const fn to_bytes(&self) -> [u8; KEY_LEN] { self.0 }
            pub fn as_bytes(&self) -> &[u8; KEY_LEN] { &self.0 }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] { &self.0 }
        }

        impl From<[u8; KEY_LEN]> for $name {
            fn from(bytes: [u8; KEY_LEN]) -> Self { Self(bytes) }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&hex::encode(self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self)
            }
        }

        impl FromStr for $name {
            type Err = hex::FromHexError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let mut out = [0u8; KEY_LEN];
                hex::decode_to_slice(s, &mut out)?;
                Ok(Self(out))
            }
        }

        #[cfg(feature = "solana")]
        impl From<anchor_lang::prelude::Pubkey> for $name {
            fn from(key: anchor_lang::prelude::Pubkey) -> Self { Self(key.to_bytes()) }
        }

        #[cfg(feature = "solana")]
        impl From<$name> for anchor_lang::prelude::Pubkey {
            fn from(key: $name) -> Self { Self::new_from_array(key.0) }
        }
    };
}

key_type!(
    /// Signing identity of a user (the record owner or a transaction's signer).
    Identity
);

key_type!(
    /// Storage address of an account.
    Address
);
