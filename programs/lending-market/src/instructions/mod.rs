pub mod add_collateral;
pub mod borrow;
pub mod deposit;
pub mod deposit_collateral;
pub mod initialize_market;
pub mod oracle_admin;
pub mod rate_model_admin;
pub mod repay;
pub mod view;
pub mod withdraw;
pub mod withdraw_collateral;

pub use add_collateral::*;
pub use borrow::*;
pub use deposit::*;
pub use deposit_collateral::*;
pub use initialize_market::*;
pub use oracle_admin::*;
pub use rate_model_admin::*;
pub use repay::*;
pub use view::*;
pub use withdraw::*;
pub use withdraw_collateral::*;
