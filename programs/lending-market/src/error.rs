use anchor_lang::prelude::*;

#[error_code]
pub enum LendingError {
    #[msg("Amount must be greater than zero")]
    ZeroAmount,

    #[msg("LTV ratio must be between 1 and 100")]
    InvalidLtvRatio,

    #[msg("Collateral asset already registered")]
    AssetAlreadySupported,

    #[msg("Collateral asset not registered")]
    AssetNotSupported,

    #[msg("Asset decimals must be <= 9")]
    InvalidAssetDecimals,

    #[msg("Price feed already registered for this asset")]
    DuplicateFeed,

    #[msg("No price feed registered for this asset")]
    FeedNotFound,

    #[msg("Price is zero or negative")]
    InvalidPrice,

    #[msg("Price is older than the market's staleness tolerance")]
    StalePrice,

    #[msg("Insufficient shares balance")]
    InsufficientShares,

    #[msg("Vault does not hold enough idle liquidity")]
    InsufficientLiquidity,

    #[msg("Withdrawal would leave the position undercollateralized")]
    InsufficientCollateral,

    #[msg("Borrow amount exceeds borrowing power")]
    OverBorrowableAmount,

    #[msg("Caller has no outstanding debt")]
    NoOutstandingDebt,

    #[msg("Repayment must cover accrued interest")]
    RepayBelowAccruedInterest,

    #[msg("Repayment exceeds principal plus accrued interest")]
    OverRepay,

    #[msg("Deposit too small to mint any shares")]
    DepositTooSmall,

    #[msg("Utilization above 100% signals corrupted accounting")]
    UtilizationInvariant,

    #[msg("Arithmetic overflow")]
    MathOverflow,

    #[msg("Division by zero")]
    DivisionByZero,

    #[msg("Unauthorized")]
    Unauthorized,

    #[msg("Vault is bound to a different market")]
    UnauthorizedMarket,

    #[msg("Supported collateral list is full")]
    CollateralListFull,

    #[msg("Active borrower list is full")]
    BorrowerListFull,

    #[msg("Price feed list is full")]
    FeedListFull,
}
