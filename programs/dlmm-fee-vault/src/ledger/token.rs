use anchor_lang::prelude::*;
use solana_program::program_pack::Pack;

/// Bytes allocated for an SPL token account.
pub const TOKEN_ACCOUNT_LEN: usize = spl_token::state::Account::LEN;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MintState {
    pub decimals: u8,
    pub supply: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenAccountState {
    pub mint: Pubkey,
    pub owner: Pubkey,
    pub amount: u64,
}

impl TokenAccountState {
    pub fn empty(mint: Pubkey, owner: Pubkey) -> Self {
        Self {
            mint,
            owner,
            amount: 0,
        }
    }
}
