use anchor_lang::prelude::*;

pub mod constants;
pub mod custody;
pub mod distribution;
pub mod errors;
pub mod events;
pub mod instructions;
pub mod state;

#[cfg(not(target_os = "solana"))]
pub mod ledger;

use instructions::*;

declare_id!("FeeRtG9mEpMFEBPqhN5xjLrP4KdE5FGHxFpEhGkGKQW");

#[program]
pub mod dlmm_fee_vault {
    use super::*;

    /// Initialize the fee vault and its custody accounts for a DLMM pool
    pub fn initialize_fee_vault(
        ctx: Context<InitializeFeeVault>,
        bump: u8,
        authority: Pubkey,
    ) -> Result<()> {
        instructions::initialize_fee_vault(ctx, bump, authority)
    }

    /// Move custody balances to a recipient (authority only)
    pub fn distribute_fees(
        ctx: Context<DistributeFees>,
        base_amount: u64,
        quote_amount: u64,
    ) -> Result<()> {
        instructions::distribute_fees(ctx, base_amount, quote_amount)
    }

    /// Rotate the vault authority (authority only)
    pub fn update_fee_vault(
        ctx: Context<UpdateFeeVault>,
        new_authority: Option<Pubkey>,
    ) -> Result<()> {
        instructions::update_fee_vault(ctx, new_authority)
    }
}
