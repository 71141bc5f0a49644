use anchor_lang::prelude::*;

use crate::{constants::FEE_VAULT_SEED, errors::FeeVaultError};

#[account]
#[derive(Default, Debug, PartialEq, Eq)]
pub struct FeeVault {
    /// Key allowed to distribute fees and rotate itself
    pub authority: Pubkey,

    /// The DLMM pool this vault is bound to
    pub dlmm_pool: Pubkey,

    /// Base and quote mints held in custody
    pub base_mint: Pubkey,
    pub quote_mint: Pubkey,

    /// Custody ATAs owned by the vault PDA
    pub base_custody: Pubkey,
    pub quote_custody: Pubkey,

    /// Bump seed for PDA derivation
    pub bump: u8,

    /// Lifetime inflow counters
    pub total_collected_base: u64,
    pub total_collected_quote: u64,

    /// Unix timestamp of initialization
    pub creation_time: i64,
}

/// Values a fresh vault is created from.
#[derive(Clone, Copy, Debug)]
pub struct NewFeeVault {
    pub authority: Pubkey,
    pub dlmm_pool: Pubkey,
    pub base_mint: Pubkey,
    pub quote_mint: Pubkey,
    pub base_custody: Pubkey,
    pub quote_custody: Pubkey,
    pub bump: u8,
    pub creation_time: i64,
}

impl FeeVault {
    pub const LEN: usize = 8 + // discriminator
        32 + // authority
        32 + // dlmm_pool
        32 + // base_mint
        32 + // quote_mint
        32 + // base_custody
        32 + // quote_custody
        1 + // bump
        8 + // total_collected_base
        8 + // total_collected_quote
        8; // creation_time

    pub fn new(params: NewFeeVault) -> Self {
        Self {
            authority: params.authority,
            dlmm_pool: params.dlmm_pool,
            base_mint: params.base_mint,
            quote_mint: params.quote_mint,
            base_custody: params.base_custody,
            quote_custody: params.quote_custody,
            bump: params.bump,
            total_collected_base: 0,
            total_collected_quote: 0,
            creation_time: params.creation_time,
        }
    }

    /// Canonical vault address and bump for a pool.
    pub fn derive_address(dlmm_pool: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
        Pubkey::find_program_address(&[FEE_VAULT_SEED, dlmm_pool.as_ref()], program_id)
    }

    pub fn ensure_canonical_bump(bump: u8, canonical_bump: u8) -> Result<()> {
        require!(bump == canonical_bump, FeeVaultError::InvalidSeed);
        Ok(())
    }

    pub fn ensure_authority(&self, signer: &Pubkey) -> Result<()> {
        require_keys_eq!(*signer, self.authority, FeeVaultError::Unauthorized);
        Ok(())
    }

    pub fn ensure_custody(&self, base_custody: &Pubkey, quote_custody: &Pubkey) -> Result<()> {
        require_keys_eq!(*base_custody, self.base_custody, FeeVaultError::CustodyMismatch);
        require_keys_eq!(*quote_custody, self.quote_custody, FeeVaultError::CustodyMismatch);
        Ok(())
    }

    /// Replaces the authority and returns the previous one.
    pub fn set_authority(&mut self, new_authority: Pubkey) -> Pubkey {
        std::mem::replace(&mut self.authority, new_authority)
    }
}
