pub mod initialize_fee_vault;
pub mod distribute_fees;
pub mod update_fee_vault;

pub use initialize_fee_vault::*;
pub use distribute_fees::*;
pub use update_fee_vault::*;
