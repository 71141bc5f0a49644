pub mod fee_vault;

pub use fee_vault::*;
