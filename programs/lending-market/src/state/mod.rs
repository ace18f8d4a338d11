pub mod market;
pub mod oracle;
pub mod position;
pub mod rate_model;
pub mod vault;

pub use market::*;
pub use oracle::*;
pub use position::*;
pub use rate_model::*;
pub use vault::*;
