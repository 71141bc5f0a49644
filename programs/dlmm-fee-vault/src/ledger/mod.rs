//! In-process model of the fee vault program.
//!
//! Runs the same state, validation and custody-signing code as the on-chain
//! instructions against an explicit account store, so every operation can be
//! exercised without a validator. The store plays the host's part: registry
//! uniqueness is insert-if-absent on the account map, and each operation runs
//! inside a [`Transaction`] that commits only on success.

mod token;
mod transaction;


use std::collections::BTreeMap;

use anchor_lang::error::ErrorCode;
use anchor_lang::prelude::*;
use spl_associated_token_account::get_associated_token_address;

pub use token::{MintState, TokenAccountState, TOKEN_ACCOUNT_LEN};
pub use transaction::Transaction;

use crate::{
    custody::VaultSigner,
    distribution::{validate_distribution, DistributionLeg},
    errors::FeeVaultError,
    state::{FeeVault, NewFeeVault},
};

/// Arguments of `initialize_fee_vault`.
#[derive(Clone, Copy, Debug)]
pub struct VaultSetup {
    pub bump: u8,
    pub dlmm_pool: Pubkey,
    pub base_mint: Pubkey,
    pub quote_mint: Pubkey,
    pub authority: Pubkey,
}

/// Accounts of `distribute_fees`.
#[derive(Clone, Copy, Debug)]
pub struct DistributionAccounts {
    pub fee_vault: Pubkey,
    pub base_custody: Pubkey,
    pub quote_custody: Pubkey,
    pub recipient: Pubkey,
    pub recipient_base: Pubkey,
    pub recipient_quote: Pubkey,
}

pub struct Ledger {
    program_id: Pubkey,
    unix_timestamp: i64,
    fee_vaults: BTreeMap<Pubkey, FeeVault>,
    mints: BTreeMap<Pubkey, MintState>,
    token_accounts: BTreeMap<Pubkey, TokenAccountState>,
    lamports: BTreeMap<Pubkey, u64>,
}

impl Ledger {
    pub fn new(program_id: Pubkey) -> Self {
        Self {
            program_id,
            unix_timestamp: 0,
            fee_vaults: BTreeMap::new(),
            mints: BTreeMap::new(),
            token_accounts: BTreeMap::new(),
            lamports: BTreeMap::new(),
        }
    }

    pub fn set_unix_timestamp(&mut self, unix_timestamp: i64) {
        self.unix_timestamp = unix_timestamp;
    }

    pub fn airdrop(&mut self, key: &Pubkey, lamports: u64) {
        let balance = self.lamports.entry(*key).or_default();
        *balance = balance.saturating_add(lamports);
    }

    pub fn lamports(&self, key: &Pubkey) -> u64 {
        self.lamports.get(key).copied().unwrap_or_default()
    }

    pub fn create_mint(&mut self, decimals: u8) -> Pubkey {
        let mint = Pubkey::new_unique();
        self.mints.insert(mint, MintState { decimals, supply: 0 });
        mint
    }

    pub fn mint(&self, key: &Pubkey) -> Option<&MintState> {
        self.mints.get(key)
    }

    pub fn mint_to(&mut self, account: &Pubkey, amount: u64) -> Result<()> {
        let state = self
            .token_accounts
            .get_mut(account)
            .ok_or_else(|| error!(ErrorCode::AccountNotInitialized))?;
        let mint = self
            .mints
            .get_mut(&state.mint)
            .ok_or_else(|| error!(ErrorCode::AccountNotInitialized))?;

        let supply = mint
            .supply
            .checked_add(amount)
            .ok_or(FeeVaultError::MathOverflow)?;
        let balance = state
            .amount
            .checked_add(amount)
            .ok_or(FeeVaultError::MathOverflow)?;
        mint.supply = supply;
        state.amount = balance;
        Ok(())
    }

    pub fn create_associated_token_account(
        &mut self,
        payer: &Pubkey,
        mint: &Pubkey,
        owner: &Pubkey,
    ) -> Result<Pubkey> {
        let (mint, owner) = (*mint, *owner);
        self.execute(|tx| {
            tx.mint(&mint)?;
            let address = get_associated_token_address(&owner, &mint);
            tx.fund_account(payer, &address, TOKEN_ACCOUNT_LEN)?;
            tx.create_token_account(address, TokenAccountState::empty(mint, owner))?;
            Ok(address)
        })
    }

    pub fn token_account(&self, key: &Pubkey) -> Option<&TokenAccountState> {
        self.token_accounts.get(key)
    }

    pub fn balance(&self, key: &Pubkey) -> Result<u64> {
        self.token_accounts
            .get(key)
            .map(|account| account.amount)
            .ok_or_else(|| error!(ErrorCode::AccountNotInitialized))
    }

    pub fn fee_vault(&self, key: &Pubkey) -> Option<&FeeVault> {
        self.fee_vaults.get(key)
    }

    /// Runs `op` as one atomic operation.
    pub fn execute<T>(&mut self, op: impl FnOnce(&mut Transaction<'_>) -> Result<T>) -> Result<T> {
        let mut tx = Transaction::new(self);
        let output = op(&mut tx)?;
        let writes = tx.into_writes();

        self.fee_vaults.extend(writes.fee_vaults);
        self.token_accounts.extend(writes.token_accounts);
        self.lamports.extend(writes.lamports);
        Ok(output)
    }

    pub fn initialize_fee_vault(&mut self, payer: &Pubkey, setup: VaultSetup) -> Result<Pubkey> {
        self.execute(|tx| {
            let (fee_vault, bump) = FeeVault::derive_address(&setup.dlmm_pool, &tx.program_id());
            FeeVault::ensure_canonical_bump(setup.bump, bump)?;

            tx.mint(&setup.base_mint)?;
            tx.mint(&setup.quote_mint)?;

            tx.fund_account(payer, &fee_vault, FeeVault::LEN)?;
            let base_custody = get_associated_token_address(&fee_vault, &setup.base_mint);
            let quote_custody = get_associated_token_address(&fee_vault, &setup.quote_mint);

            tx.create_fee_vault(
                fee_vault,
                FeeVault::new(NewFeeVault {
                    authority: setup.authority,
                    dlmm_pool: setup.dlmm_pool,
                    base_mint: setup.base_mint,
                    quote_mint: setup.quote_mint,
                    base_custody,
                    quote_custody,
                    bump,
                    creation_time: tx.unix_timestamp(),
                }),
            )?;

            tx.fund_account(payer, &base_custody, TOKEN_ACCOUNT_LEN)?;
            tx.create_token_account(
                base_custody,
                TokenAccountState::empty(setup.base_mint, fee_vault),
            )?;
            tx.fund_account(payer, &quote_custody, TOKEN_ACCOUNT_LEN)?;
            tx.create_token_account(
                quote_custody,
                TokenAccountState::empty(setup.quote_mint, fee_vault),
            )?;

            msg!("Fee vault initialized for DLMM pool: {}", setup.dlmm_pool);
            Ok(fee_vault)
        })
    }

    pub fn distribute_fees(
        &mut self,
        signer: &Pubkey,
        accounts: &DistributionAccounts,
        base_amount: u64,
        quote_amount: u64,
    ) -> Result<()> {
        self.execute(|tx| {
            let vault = tx.fee_vault(&accounts.fee_vault)?;
            vault.ensure_authority(signer)?;
            vault.ensure_custody(&accounts.base_custody, &accounts.quote_custody)?;

            let base_custody = tx.token_account(&accounts.base_custody)?;
            let quote_custody = tx.token_account(&accounts.quote_custody)?;
            let recipient_base = tx.token_account(&accounts.recipient_base)?;
            let recipient_quote = tx.token_account(&accounts.recipient_quote)?;

            let base_leg = DistributionLeg {
                custody_mint: base_custody.mint,
                custody_amount: base_custody.amount,
                recipient_mint: recipient_base.mint,
                amount: base_amount,
            };
            let quote_leg = DistributionLeg {
                custody_mint: quote_custody.mint,
                custody_amount: quote_custody.amount,
                recipient_mint: recipient_quote.mint,
                amount: quote_amount,
            };
            validate_distribution(&vault, &base_leg, &quote_leg)?;

            let vault_signer = VaultSigner::verify(&tx.program_id(), &accounts.fee_vault, &vault)?;
            tx.transfer(
                &vault_signer,
                &accounts.base_custody,
                &accounts.recipient_base,
                base_amount,
            )?;
            tx.transfer(
                &vault_signer,
                &accounts.quote_custody,
                &accounts.recipient_quote,
                quote_amount,
            )?;

            msg!(
                "Distributed fees to {}: Base {}, Quote {}",
                accounts.recipient,
                base_amount,
                quote_amount
            );
            Ok(())
        })
    }

    pub fn update_fee_vault(
        &mut self,
        signer: &Pubkey,
        fee_vault: &Pubkey,
        new_authority: Option<Pubkey>,
    ) -> Result<()> {
        self.execute(|tx| {
            let mut vault = tx.fee_vault(fee_vault)?;
            vault.ensure_authority(signer)?;

            if let Some(new_authority) = new_authority {
                vault.set_authority(new_authority);
                tx.put_fee_vault(*fee_vault, vault);
                msg!("Fee vault authority updated to: {}", new_authority);
            }
            Ok(())
        })
    }
}
