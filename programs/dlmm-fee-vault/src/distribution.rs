use anchor_lang::prelude::*;

use crate::{errors::FeeVaultError, state::FeeVault};

/// One side (base or quote) of a distribution: a custody account paying a
/// recipient account.
#[derive(Clone, Copy, Debug)]
pub struct DistributionLeg {
    pub custody_mint: Pubkey,
    pub custody_amount: u64,
    pub recipient_mint: Pubkey,
    pub amount: u64,
}

impl DistributionLeg {
    pub fn validate(&self, vault_mint: &Pubkey) -> Result<()> {
        require_keys_eq!(self.custody_mint, *vault_mint, FeeVaultError::AssetMismatch);
        require_keys_eq!(self.recipient_mint, *vault_mint, FeeVaultError::AssetMismatch);
        require!(
            self.custody_amount >= self.amount,
            FeeVaultError::InsufficientFunds
        );
        Ok(())
    }
}

/// Checks both legs before any transfer happens, so a failing quote leg
/// never leaves a base transfer behind.
pub fn validate_distribution(
    vault: &FeeVault,
    base: &DistributionLeg,
    quote: &DistributionLeg,
) -> Result<()> {
    base.validate(&vault.base_mint)?;
    quote.validate(&vault.quote_mint)?;
    Ok(())
}
