//! # Module overview
//! Host-side core of the favorites program: one record per user, holding a
//! favorite number and a favorite color, stored at an address derived from the
//! user's key.
//!
//! address: AddressDeriver, seeds [namespace_tag, owner, bump] behind an AddressSpace capability.
//! machine: FavoritesStateMachine, the create and partial-update transitions.
//! accessor: RecordAccessor, committed bytes back to a typed Record.
//! store: AccountStore seam to the ledger, plus an in-memory implementation.
//! instruction: Transition, Anchor-compatible instruction data, receipts.
//!
//! The on-chain program shares NAMESPACE_TAG, MAX_COLOR_LEN, the account layout
//! and FieldUpdate with this crate.

pub mod accessor;
pub mod address;
pub mod config;
pub mod error;
pub mod instruction;
pub mod key;
pub mod machine;
pub mod record;
pub mod store;

pub use accessor::RecordAccessor;
#[cfg(feature = "solana")]
pub use address::SolanaAddressSpace;
pub use address::{AddressDeriver, AddressSpace, DerivedAddress, UnconstrainedAddressSpace};
pub use config::FavoritesConfig;
pub use error::{DecodeError, DerivationError, ErrorKind, FavoritesError, StoreError};
pub use instruction::{Transition, TransitionId, TransitionReceipt};
pub use key::{Address, Identity};
pub use machine::FavoritesStateMachine;
pub use record::{FieldUpdate, Record, ACCOUNT_SPACE, MAX_COLOR_LEN};
pub use store::{AccountStore, CommitMode, InMemoryAccountStore};

/// First PDA seed of every favorites account.
pub const NAMESPACE_TAG: &[u8] = b"favorites";

/// Solana's per-seed length limit.
pub const MAX_SEED_LEN: usize = 32;

/// CoECuBoRJpZVUhRSn3Ncm2mZDXxxN6yiYqaw9H9EEpJx
pub const FAVORITES_PROGRAM_ID: Address = Address::new([
    175, 72, 52, 92, 166, 173, 85, 197, 57, 123, 212, 76, 136, 94, 177, 60, 38, 88, 4, 38, 125,
    180, 69, 58, 80, 178, 124, 181, 132, 58, 232, 133,
]);
