//! Partial update of existing favorites.
//!
//! Each argument is optional; None keeps the stored value. Only the stored
//! owner may update: the PDA is re-derived from the stored owner, so another
//! signer reaches the owner check and fails with Unauthorized.

use anchor_lang::prelude::*;
use favorites_core::record::{validate_color, FieldUpdate};

use crate::state::{ErrorCode, Favorites, MAX_COLOR_LEN, NAMESPACE_TAG};

/// Accounts for updating the favorites PDA.
#[derive(Accounts)]
pub struct UpdateFavorites<'info> {
    pub user: Signer<'info>,

    #[account(
        mut,
        seeds=[NAMESPACE_TAG, favorites.owner.as_ref()], bump,
        constraint = favorites.owner == user.key() @ ErrorCode::Unauthorized
    )]
    pub favorites: Account<'info, Favorites>,
}

/// Overwrites the supplied fields and leaves the rest untouched.
pub fn handle_update_favorites(
    ctx       : Context<UpdateFavorites>,
    new_number: Option<u64>,
    new_color : Option<String>,
) -> Result<()> {
    if let Some(color) = &new_color {
        validate_color(color, MAX_COLOR_LEN).map_err(|_| ErrorCode::ColorTooLong)?;
    }

    let number = FieldUpdate::from(new_number);
    let color  = FieldUpdate::from(new_color);
    if let FieldUpdate::SetTo(n) = &number { msg!("Updating number to {}", n); }
    if let FieldUpdate::SetTo(c) = &color  { msg!("Updating color to {}", c); }

    let favorites = &mut ctx.accounts.favorites;
    number.apply_to(&mut favorites.number);
    color.apply_to(&mut favorites.color);
    Ok(())
}
