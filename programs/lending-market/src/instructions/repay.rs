use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked,
};

use crate::constants::MARKET_SEED;
use crate::error::LendingError;
use crate::events::Repaid;
use crate::state::{Market, OracleRegistry, RateModel, Vault};

#[derive(Accounts)]
pub struct Repay<'info> {
    #[account(mut)]
    pub borrower: Signer<'info>,

    #[account(
        mut,
        seeds = [MARKET_SEED, market.asset_mint.as_ref()],
        bump = market.bump,
        has_one = vault,
        has_one = oracle,
        has_one = rate_model,
        has_one = asset_mint,
    )]
    pub market: Box<Account<'info, Market>>,

    #[account(
        mut,
        has_one = asset_vault,
        constraint = vault.market == market.key() @ LendingError::UnauthorizedMarket,
    )]
    pub vault: Box<Account<'info, Vault>>,

    pub oracle: Box<Account<'info, OracleRegistry>>,
    pub rate_model: Box<Account<'info, RateModel>>,

    pub asset_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(mut)]
    pub asset_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        associated_token::mint = asset_mint,
        associated_token::authority = borrower,
        associated_token::token_program = token_program,
    )]
    pub borrower_token_account: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
}

pub fn handler(ctx: Context<Repay>, amount: u64) -> Result<()> {
    require!(amount > 0, LendingError::ZeroAmount);

    let now = Clock::get()?.unix_timestamp;
    let borrower = ctx.accounts.borrower.key();
    let market_key = ctx.accounts.market.key();

    // Interest first, then principal; rejects amounts short of the accrued
    // interest and amounts beyond the full outstanding debt.
    let (interest_paid, principal_paid, remaining) =
        ctx.accounts.market.record_repay(&borrower, amount, now)?;

    // The physical funds, interest included, go straight back to custody.
    transfer_checked(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            TransferChecked {
                from: ctx.accounts.borrower_token_account.to_account_info(),
                mint: ctx.accounts.asset_mint.to_account_info(),
                to: ctx.accounts.asset_vault.to_account_info(),
                authority: ctx.accounts.borrower.to_account_info(),
            },
        ),
        amount,
        ctx.accounts.asset_mint.decimals,
    )?;
    ctx.accounts.vault.admin_repay(&market_key, amount)?;

    // A still-open position gets a fresh rate snapshot at this checkpoint.
    if remaining > 0 {
        let outstanding_all = ctx.accounts.market.borrowed_plus_interest(now)?;
        let total_supplied = ctx.accounts.vault.total_assets(outstanding_all)?;
        let utilization = RateModel::utilization(outstanding_all, total_supplied)?;
        let volatility = ctx
            .accounts
            .oracle
            .volatility(&ctx.accounts.market.asset_mint);
        let rate = ctx.accounts.rate_model.borrow_rate(utilization, volatility, 0)?;
        ctx.accounts.market.reprice_debt(&borrower, rate)?;
    }

    emit!(Repaid {
        market: market_key,
        borrower,
        interest_paid,
        principal_paid,
        remaining_principal: remaining,
    });

    Ok(())
}
