use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked},
};

use crate::constants::{MARKET_SEED, USER_SEED};
use crate::error::LendingError;
use crate::events::CollateralWithdrawn;
use crate::state::{Market, OracleRegistry, UserAccount};

#[derive(Accounts)]
pub struct WithdrawCollateral<'info> {
    #[account(mut)]
    pub user: Signer<'info>,

    #[account(
        seeds = [MARKET_SEED, market.asset_mint.as_ref()],
        bump = market.bump,
        has_one = oracle,
    )]
    pub market: Box<Account<'info, Market>>,

    #[account(
        mut,
        seeds = [USER_SEED, market.key().as_ref(), user.key().as_ref()],
        bump = user_account.bump,
    )]
    pub user_account: Box<Account<'info, UserAccount>>,

    /// Only consulted while the user has outstanding debt.
    pub oracle: Box<Account<'info, OracleRegistry>>,

    pub collateral_mint: InterfaceAccount<'info, Mint>,

    #[account(
        mut,
        associated_token::mint = collateral_mint,
        associated_token::authority = market,
        associated_token::token_program = token_program,
    )]
    pub collateral_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        init_if_needed,
        payer = user,
        associated_token::mint = collateral_mint,
        associated_token::authority = user,
        associated_token::token_program = token_program,
    )]
    pub user_token_account: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<WithdrawCollateral>, amount: u64) -> Result<()> {
    require!(amount > 0, LendingError::ZeroAmount);

    let now = Clock::get()?.unix_timestamp;
    let asset_mint = ctx.accounts.collateral_mint.key();
    let user_key = ctx.accounts.user.key();

    // Apply the withdrawal, then check the post-withdrawal position still
    // covers the debt; an error unwinds the whole transaction.
    ctx.accounts
        .user_account
        .record_collateral_withdraw(&asset_mint, amount)?;

    let outstanding = ctx.accounts.market.outstanding_debt(&user_key, now)?;
    if outstanding > 0 {
        let power = ctx.accounts.market.borrowing_power(
            &ctx.accounts.user_account,
            &ctx.accounts.oracle,
            now,
        )?;
        require!(power >= outstanding, LendingError::InsufficientCollateral);
    }

    let borrow_mint = ctx.accounts.market.asset_mint;
    let signer_seeds: &[&[&[u8]]] = &[&[
        MARKET_SEED,
        borrow_mint.as_ref(),
        &[ctx.accounts.market.bump],
    ]];
    transfer_checked(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            TransferChecked {
                from: ctx.accounts.collateral_vault.to_account_info(),
                mint: ctx.accounts.collateral_mint.to_account_info(),
                to: ctx.accounts.user_token_account.to_account_info(),
                authority: ctx.accounts.market.to_account_info(),
            },
            signer_seeds,
        ),
        amount,
        ctx.accounts.collateral_mint.decimals,
    )?;

    emit!(CollateralWithdrawn {
        market: ctx.accounts.market.key(),
        user: user_key,
        asset_mint,
        amount,
        balance: ctx.accounts.user_account.collateral_balance(&asset_mint),
    });

    Ok(())
}
