use anchor_lang::prelude::*;

#[event]
pub struct FeeVaultInitialized {
    pub fee_vault: Pubkey,
    pub dlmm_pool: Pubkey,
    pub authority: Pubkey,
    pub base_mint: Pubkey,
    pub quote_mint: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct FeesDistributed {
    pub fee_vault: Pubkey,
    pub recipient: Pubkey,
    pub base_amount: u64,
    pub quote_amount: u64,
    pub timestamp: i64,
}

#[event]
pub struct AuthorityUpdated {
    pub fee_vault: Pubkey,
    pub previous_authority: Pubkey,
    pub new_authority: Pubkey,
}
