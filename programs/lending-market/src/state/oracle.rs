use anchor_lang::prelude::*;

use crate::constants::{MAX_DECIMALS, MAX_PRICE_FEEDS, RATE_SCALE};
use crate::error::LendingError;
use crate::math::{mul_div, Rounding};

/// Owner-gated push oracle. Markets read prices through
/// [`OracleRegistry::latest_price`], which refuses unset, non-positive and
/// stale values; there is no fallback pricing.
#[account]
#[derive(InitSpace)]
pub struct OracleRegistry {
    pub authority: Pubkey,
    pub bump: u8,
    #[max_len(MAX_PRICE_FEEDS)]
    pub feeds: Vec<PriceFeed>,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, InitSpace)]
pub struct PriceFeed {
    pub asset_mint: Pubkey,
    /// Latest pushed price of one whole token, scaled by 10^decimals.
    /// Zero until the first update; the read path treats <= 0 as unusable.
    pub price: i64,
    pub decimals: u8,
    pub updated_at: i64,
    /// Relative change of the last update, RATE_SCALE fixed point.
    pub volatility: u64,
}

impl OracleRegistry {
    pub fn feed(&self, asset_mint: &Pubkey) -> Result<&PriceFeed> {
        self.feeds
            .iter()
            .find(|f| f.asset_mint == *asset_mint)
            .ok_or_else(|| error!(LendingError::FeedNotFound))
    }

    pub fn add_feed(&mut self, asset_mint: Pubkey, decimals: u8) -> Result<()> {
        require!(decimals <= MAX_DECIMALS, LendingError::InvalidAssetDecimals);
        require!(
            !self.feeds.iter().any(|f| f.asset_mint == asset_mint),
            LendingError::DuplicateFeed
        );
        require!(
            self.feeds.len() < MAX_PRICE_FEEDS,
            LendingError::FeedListFull
        );

        self.feeds.push(PriceFeed {
            asset_mint,
            price: 0,
            decimals,
            updated_at: 0,
            volatility: 0,
        });
        Ok(())
    }

    pub fn update_feed(&mut self, asset_mint: &Pubkey, price: i64, now: i64) -> Result<()> {
        let feed = self
            .feeds
            .iter_mut()
            .find(|f| f.asset_mint == *asset_mint)
            .ok_or_else(|| error!(LendingError::FeedNotFound))?;

        feed.volatility = if feed.price > 0 && price > 0 {
            let delta = (price - feed.price).unsigned_abs();
            mul_div(delta, RATE_SCALE, feed.price as u64, Rounding::Floor)?
        } else {
            0
        };
        feed.price = price;
        feed.updated_at = now;
        Ok(())
    }

    pub fn remove_feed(&mut self, asset_mint: &Pubkey) -> Result<()> {
        let index = self
            .feeds
            .iter()
            .position(|f| f.asset_mint == *asset_mint)
            .ok_or_else(|| error!(LendingError::FeedNotFound))?;
        self.feeds.swap_remove(index);
        Ok(())
    }

    /// Latest usable price: (price, price_decimals). Fails if the feed is
    /// missing, the value is non-positive, or older than `max_age` seconds.
    pub fn latest_price(&self, asset_mint: &Pubkey, now: i64, max_age: i64) -> Result<(u64, u8)> {
        let feed = self.feed(asset_mint)?;
        require!(feed.price > 0, LendingError::InvalidPrice);
        require!(
            now.saturating_sub(feed.updated_at) <= max_age,
            LendingError::StalePrice
        );
        Ok((feed.price as u64, feed.decimals))
    }

    /// Stored volatility of the last update, 0 for unknown assets. Reading
    /// this never fails: it only shapes the rate, not valuation.
    pub fn volatility(&self, asset_mint: &Pubkey) -> u64 {
        self.feeds
            .iter()
            .find(|f| f.asset_mint == *asset_mint)
            .map(|f| f.volatility)
            .unwrap_or(0)
    }
}
