use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{Mint, TokenAccount, TokenInterface},
};

use crate::constants::{MARKET_SEED, MAX_DECIMALS, SHARES_MINT_SEED, VAULT_SEED};
use crate::error::LendingError;
use crate::events::MarketInitialized;
use crate::state::{Market, OracleRegistry, RateModel, Vault};

#[derive(Accounts)]
pub struct InitializeMarket<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    /// The borrowable asset.
    pub asset_mint: InterfaceAccount<'info, Mint>,

    #[account(
        init,
        payer = authority,
        space = 8 + Market::INIT_SPACE,
        seeds = [MARKET_SEED, asset_mint.key().as_ref()],
        bump
    )]
    pub market: Box<Account<'info, Market>>,

    #[account(
        init,
        payer = authority,
        space = 8 + Vault::INIT_SPACE,
        seeds = [VAULT_SEED, market.key().as_ref()],
        bump
    )]
    pub vault: Box<Account<'info, Vault>>,

    /// Share mint with the asset's decimals, so bootstrap is 1:1 in raw
    /// units. The vault PDA is the sole mint authority.
    #[account(
        init,
        payer = authority,
        seeds = [SHARES_MINT_SEED, vault.key().as_ref()],
        bump,
        mint::decimals = asset_mint.decimals,
        mint::authority = vault,
        mint::token_program = token_program,
    )]
    pub shares_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        init,
        payer = authority,
        associated_token::mint = asset_mint,
        associated_token::authority = vault,
        associated_token::token_program = token_program,
    )]
    pub asset_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    pub oracle: Account<'info, OracleRegistry>,
    pub rate_model: Account<'info, RateModel>,

    pub token_program: Interface<'info, TokenInterface>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<InitializeMarket>, max_price_age: i64) -> Result<()> {
    require!(
        ctx.accounts.asset_mint.decimals <= MAX_DECIMALS,
        LendingError::InvalidAssetDecimals
    );
    require!(max_price_age > 0, LendingError::ZeroAmount);

    let market = &mut ctx.accounts.market;
    market.authority = ctx.accounts.authority.key();
    market.asset_mint = ctx.accounts.asset_mint.key();
    market.asset_decimals = ctx.accounts.asset_mint.decimals;
    market.vault = ctx.accounts.vault.key();
    market.oracle = ctx.accounts.oracle.key();
    market.rate_model = ctx.accounts.rate_model.key();
    market.max_price_age = max_price_age;
    market.total_principal = 0;
    market.bump = ctx.bumps.market;
    market.collaterals = Vec::new();
    market.debts = Vec::new();

    let vault = &mut ctx.accounts.vault;
    vault.market = ctx.accounts.market.key();
    vault.asset_mint = ctx.accounts.asset_mint.key();
    vault.shares_mint = ctx.accounts.shares_mint.key();
    vault.asset_vault = ctx.accounts.asset_vault.key();
    vault.total_idle = 0;
    vault.bump = ctx.bumps.vault;

    emit!(MarketInitialized {
        market: ctx.accounts.market.key(),
        vault: ctx.accounts.vault.key(),
        asset_mint: ctx.accounts.asset_mint.key(),
        oracle: ctx.accounts.oracle.key(),
        rate_model: ctx.accounts.rate_model.key(),
    });

    Ok(())
}
