use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{Mint, TokenAccount, TokenInterface},
};

use crate::constants::MARKET_SEED;
use crate::error::LendingError;
use crate::events::CollateralTokenAdded;
use crate::state::Market;

#[derive(Accounts)]
pub struct AddCollateralToken<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [MARKET_SEED, market.asset_mint.as_ref()],
        bump = market.bump,
        has_one = authority @ LendingError::Unauthorized,
    )]
    pub market: Box<Account<'info, Market>>,

    pub collateral_mint: InterfaceAccount<'info, Mint>,

    /// Market custody for this collateral asset.
    #[account(
        init,
        payer = authority,
        associated_token::mint = collateral_mint,
        associated_token::authority = market,
        associated_token::token_program = token_program,
    )]
    pub collateral_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<AddCollateralToken>, ltv: u64) -> Result<()> {
    let asset_mint = ctx.accounts.collateral_mint.key();
    let decimals = ctx.accounts.collateral_mint.decimals;

    ctx.accounts
        .market
        .add_collateral_token(asset_mint, ltv, decimals)?;

    emit!(CollateralTokenAdded {
        market: ctx.accounts.market.key(),
        asset_mint,
        ltv,
    });

    Ok(())
}
