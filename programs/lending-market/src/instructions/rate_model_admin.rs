use anchor_lang::prelude::*;

use crate::constants::RATE_MODEL_SEED;
use crate::error::LendingError;
use crate::events::RateModelUpdated;
use crate::state::RateModel;

#[derive(Accounts)]
pub struct InitializeRateModel<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        init,
        payer = authority,
        space = 8 + RateModel::INIT_SPACE,
        seeds = [RATE_MODEL_SEED, authority.key().as_ref()],
        bump
    )]
    pub rate_model: Account<'info, RateModel>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct UpdateRateModel<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [RATE_MODEL_SEED, authority.key().as_ref()],
        bump = rate_model.bump,
        has_one = authority @ LendingError::Unauthorized,
    )]
    pub rate_model: Account<'info, RateModel>,
}

pub fn initialize_rate_model(
    ctx: Context<InitializeRateModel>,
    base_rate: u64,
    slope: u64,
    price_factor: u64,
    supply_factor: u64,
) -> Result<()> {
    let rate_model = &mut ctx.accounts.rate_model;
    rate_model.authority = ctx.accounts.authority.key();
    rate_model.bump = ctx.bumps.rate_model;
    rate_model.base_rate = base_rate;
    rate_model.slope = slope;
    rate_model.price_factor = price_factor;
    rate_model.supply_factor = supply_factor;

    emit!(RateModelUpdated {
        rate_model: rate_model.key(),
        base_rate,
        slope,
        price_factor,
        supply_factor,
    });
    Ok(())
}

pub fn update_rate_model(
    ctx: Context<UpdateRateModel>,
    base_rate: u64,
    slope: u64,
    price_factor: u64,
    supply_factor: u64,
) -> Result<()> {
    let rate_model = &mut ctx.accounts.rate_model;
    rate_model.base_rate = base_rate;
    rate_model.slope = slope;
    rate_model.price_factor = price_factor;
    rate_model.supply_factor = supply_factor;

    emit!(RateModelUpdated {
        rate_model: rate_model.key(),
        base_rate,
        slope,
        price_factor,
        supply_factor,
    });
    Ok(())
}
