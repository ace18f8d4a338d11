pub const MARKET_SEED: &[u8] = b"market";
pub const VAULT_SEED: &[u8] = b"vault";
pub const SHARES_MINT_SEED: &[u8] = b"shares";
pub const USER_SEED: &[u8] = b"user";
pub const ORACLE_SEED: &[u8] = b"oracle";
pub const RATE_MODEL_SEED: &[u8] = b"rate_model";

/// Largest supported token decimals; collateral values are normalized to
/// this reference base before LTV weighting.
pub const MAX_DECIMALS: u8 = 9;
pub const REFERENCE_DECIMALS: u8 = 9;

/// Fixed-point scale for borrow rates, utilization and volatility (1e18).
pub const RATE_SCALE: u64 = 1_000_000_000_000_000_000;
pub const SECONDS_PER_YEAR: u64 = 31_536_000;

/// LTV ratios are whole percentages in [MIN_LTV, MAX_LTV].
pub const LTV_DENOMINATOR: u64 = 100;
pub const MIN_LTV: u64 = 1;
pub const MAX_LTV: u64 = 100;

// On-chain accounts are fixed-size, so every growable list carries an
// explicit capacity.
pub const MAX_COLLATERAL_TYPES: usize = 8;
pub const MAX_USER_COLLATERALS: usize = 8;
pub const MAX_ACTIVE_BORROWERS: usize = 32;
pub const MAX_PRICE_FEEDS: usize = 16;
