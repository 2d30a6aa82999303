//! On-chain state layout.
//!
//! Favorites: one per user at PDA [b"favorites", user]. Allocated at the
//! maximum size (102 bytes) so later color updates never need a realloc.

use anchor_lang::prelude::*;

// Shared with the host-side core so both sides agree on seeds and sizes.
pub use favorites_core::record::{ACCOUNT_SPACE, MAX_COLOR_LEN};
pub use favorites_core::NAMESPACE_TAG;

/// A user's favorite number and color.
#[account]
pub struct Favorites {
    pub owner : Pubkey,
    pub number: u64,
    pub color : String, // <= MAX_COLOR_LEN bytes
}

#[error_code(offset = 7000)]
pub enum ErrorCode {
    #[msg("color longer than 50 bytes")]           ColorTooLong,
    #[msg("signer does not own these favorites")] Unauthorized,
}
