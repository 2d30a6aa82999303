//! # Module overview
//! Per-user favorites: a favorite number and color stored at a PDA derived
//! from the user's key, created once and then updatable field by field.
//!
//! # Instruction set
//! set_favorites: create the user's favorites account (fails if it exists).
//! update_favorites: overwrite number and/or color; omitted fields are kept.

#![allow(unexpected_cfgs)] // Keep until Anchor's cfg layout is simplified
#![allow(deprecated)] // Remove once Anchor moves to AccountInfo::resize()

use anchor_lang::prelude::*;

mod state;
mod create;
mod update;

// Program ID
declare_id!("CoECuBoRJpZVUhRSn3Ncm2mZDXxxN6yiYqaw9H9EEpJx");

// Re-exports (globs also carry Anchor's generated __client_accounts_* modules)
pub use state ::{ Favorites, ErrorCode };
pub use create::*;
pub use update::*;

#[program]
pub mod favorites {
    use super::*;

    /// Creates the signer's favorites account with the given number and color.
    pub fn set_favorites(ctx: Context<SetFavorites>, number: u64, color: String) -> Result<()> {
        create::handle_set_favorites(ctx, number, color)
    }

    /// Updates the signer's number and/or color.
    pub fn update_favorites(
        ctx       : Context<UpdateFavorites>,
        new_number: Option<u64>,
        new_color : Option<String>,
    ) -> Result<()> {
        update::handle_update_favorites(ctx, new_number, new_color)
    }
}
