//! First write of a user's favorites.
//!
//! SetFavorites / handle_set_favorites: `init` at the user's PDA, so a second
//! call for the same user fails in the system program (account already in use).

use anchor_lang::prelude::*;
use favorites_core::record::validate_color;

use crate::state::{ErrorCode, Favorites, ACCOUNT_SPACE, MAX_COLOR_LEN, NAMESPACE_TAG};

/// Accounts for creating the favorites PDA.
#[derive(Accounts)]
pub struct SetFavorites<'info> {
    #[account(mut)]
    pub user: Signer<'info>,

    #[account(
        init, payer=user, space=ACCOUNT_SPACE, // Always 102 bytes
        seeds=[NAMESPACE_TAG, user.key().as_ref()], bump
    )]
    pub favorites: Account<'info, Favorites>,

    pub system_program: Program<'info, System>,
}

/// Stores number and color, owned by the signer.
pub fn handle_set_favorites(ctx: Context<SetFavorites>, number: u64, color: String) -> Result<()> {
    validate_color(&color, MAX_COLOR_LEN).map_err(|_| ErrorCode::ColorTooLong)?;

    let user = ctx.accounts.user.key();
    msg!("Greetings from {}", ctx.program_id);
    msg!("User {}'s favorite number is {} and favorite color is: {}", user, number, color);

    ctx.accounts.favorites.set_inner(Favorites { owner: user, number, color });
    Ok(())
}
