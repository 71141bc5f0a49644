use std::collections::BTreeMap;

use anchor_lang::error::ErrorCode;
use anchor_lang::prelude::*;

use super::{
    token::{MintState, TokenAccountState},
    Ledger,
};
use crate::{custody::VaultSigner, errors::FeeVaultError, state::FeeVault};

/// Writes buffered by a [`Transaction`], applied to the ledger on commit.
#[derive(Default)]
pub(super) struct PendingWrites {
    pub fee_vaults: BTreeMap<Pubkey, FeeVault>,
    pub token_accounts: BTreeMap<Pubkey, TokenAccountState>,
    pub lamports: BTreeMap<Pubkey, u64>,
}

/// A single atomic operation against a [`Ledger`].
///
/// Reads go through the buffered writes first and fall back to committed
/// state. Nothing reaches the ledger unless the operation returns `Ok`.
pub struct Transaction<'a> {
    ledger: &'a Ledger,
    writes: PendingWrites,
}

impl<'a> Transaction<'a> {
    pub(super) fn new(ledger: &'a Ledger) -> Self {
        Self {
            ledger,
            writes: PendingWrites::default(),
        }
    }

    pub(super) fn into_writes(self) -> PendingWrites {
        self.writes
    }

    pub fn program_id(&self) -> Pubkey {
        self.ledger.program_id
    }

    pub fn unix_timestamp(&self) -> i64 {
        self.ledger.unix_timestamp
    }

    fn is_occupied(&self, key: &Pubkey) -> bool {
        self.writes.fee_vaults.contains_key(key)
            || self.writes.token_accounts.contains_key(key)
            || self.ledger.fee_vaults.contains_key(key)
            || self.ledger.token_accounts.contains_key(key)
            || self.ledger.mints.contains_key(key)
    }

    pub fn fee_vault(&self, key: &Pubkey) -> Result<FeeVault> {
        self.writes
            .fee_vaults
            .get(key)
            .or_else(|| self.ledger.fee_vaults.get(key))
            .cloned()
            .ok_or_else(|| error!(ErrorCode::AccountNotInitialized))
    }

    /// Insert-if-absent: the only guard against a second vault per pool.
    pub fn create_fee_vault(&mut self, key: Pubkey, vault: FeeVault) -> Result<()> {
        require!(!self.is_occupied(&key), FeeVaultError::AlreadyExists);
        self.writes.fee_vaults.insert(key, vault);
        Ok(())
    }

    pub fn put_fee_vault(&mut self, key: Pubkey, vault: FeeVault) {
        self.writes.fee_vaults.insert(key, vault);
    }

    pub fn mint(&self, key: &Pubkey) -> Result<MintState> {
        self.ledger
            .mints
            .get(key)
            .copied()
            .ok_or_else(|| error!(ErrorCode::AccountNotInitialized))
    }

    pub fn token_account(&self, key: &Pubkey) -> Result<TokenAccountState> {
        self.writes
            .token_accounts
            .get(key)
            .or_else(|| self.ledger.token_accounts.get(key))
            .copied()
            .ok_or_else(|| error!(ErrorCode::AccountNotInitialized))
    }

    pub fn create_token_account(&mut self, key: Pubkey, account: TokenAccountState) -> Result<()> {
        require!(!self.is_occupied(&key), FeeVaultError::AlreadyExists);
        self.writes.token_accounts.insert(key, account);
        Ok(())
    }

    pub fn lamports(&self, key: &Pubkey) -> u64 {
        self.writes
            .lamports
            .get(key)
            .or_else(|| self.ledger.lamports.get(key))
            .copied()
            .unwrap_or_default()
    }

    /// Moves the rent-exempt minimum for `space` bytes from `payer` to `account`.
    pub fn fund_account(&mut self, payer: &Pubkey, account: &Pubkey, space: usize) -> Result<()> {
        let rent = Rent::default().minimum_balance(space);
        if payer == account {
            require!(
                self.lamports(payer) >= rent,
                FeeVaultError::StorageFundingFailure
            );
            return Ok(());
        }

        let payer_balance = self
            .lamports(payer)
            .checked_sub(rent)
            .ok_or(FeeVaultError::StorageFundingFailure)?;
        let account_balance = self
            .lamports(account)
            .checked_add(rent)
            .ok_or(FeeVaultError::MathOverflow)?;

        self.writes.lamports.insert(*payer, payer_balance);
        self.writes.lamports.insert(*account, account_balance);
        Ok(())
    }

    /// Moves `amount` out of an account owned by the vault behind `signer`.
    pub fn transfer(
        &mut self,
        signer: &VaultSigner,
        from: &Pubkey,
        to: &Pubkey,
        amount: u64,
    ) -> Result<()> {
        let mut source = self.token_account(from)?;
        let mut destination = self.token_account(to)?;

        require_keys_eq!(source.owner, signer.vault(), FeeVaultError::CustodyMismatch);
        require_keys_eq!(source.mint, destination.mint, FeeVaultError::AssetMismatch);

        source.amount = source
            .amount
            .checked_sub(amount)
            .ok_or(FeeVaultError::InsufficientFunds)?;
        if from == to {
            return Ok(());
        }
        destination.amount = destination
            .amount
            .checked_add(amount)
            .ok_or(FeeVaultError::MathOverflow)?;

        self.writes.token_accounts.insert(*from, source);
        self.writes.token_accounts.insert(*to, destination);
        Ok(())
    }
}
