use anchor_lang::prelude::*;

use crate::constants::ORACLE_SEED;
use crate::error::LendingError;
use crate::events::{FeedAdded, FeedRemoved, FeedUpdated};
use crate::state::OracleRegistry;

#[derive(Accounts)]
pub struct InitializeOracle<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        init,
        payer = authority,
        space = 8 + OracleRegistry::INIT_SPACE,
        seeds = [ORACLE_SEED, authority.key().as_ref()],
        bump
    )]
    pub oracle: Account<'info, OracleRegistry>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct OracleAdmin<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [ORACLE_SEED, authority.key().as_ref()],
        bump = oracle.bump,
        has_one = authority @ LendingError::Unauthorized,
    )]
    pub oracle: Account<'info, OracleRegistry>,
}

pub fn initialize_oracle(ctx: Context<InitializeOracle>) -> Result<()> {
    let oracle = &mut ctx.accounts.oracle;
    oracle.authority = ctx.accounts.authority.key();
    oracle.bump = ctx.bumps.oracle;
    oracle.feeds = Vec::new();
    Ok(())
}

pub fn add_feed(ctx: Context<OracleAdmin>, asset_mint: Pubkey, decimals: u8) -> Result<()> {
    ctx.accounts.oracle.add_feed(asset_mint, decimals)?;

    emit!(FeedAdded {
        oracle: ctx.accounts.oracle.key(),
        asset_mint,
        decimals,
    });
    Ok(())
}

pub fn update_feed(ctx: Context<OracleAdmin>, asset_mint: Pubkey, price: i64) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    ctx.accounts.oracle.update_feed(&asset_mint, price, now)?;

    emit!(FeedUpdated {
        oracle: ctx.accounts.oracle.key(),
        asset_mint,
        price,
        volatility: ctx.accounts.oracle.volatility(&asset_mint),
    });
    Ok(())
}

pub fn remove_feed(ctx: Context<OracleAdmin>, asset_mint: Pubkey) -> Result<()> {
    ctx.accounts.oracle.remove_feed(&asset_mint)?;

    emit!(FeedRemoved {
        oracle: ctx.accounts.oracle.key(),
        asset_mint,
    });
    Ok(())
}
