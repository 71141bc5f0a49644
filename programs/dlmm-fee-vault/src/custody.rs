use anchor_lang::prelude::*;

use crate::{constants::FEE_VAULT_SEED, errors::FeeVaultError, state::FeeVault};

/// Proof that the caller may move tokens out of a fee vault's custody accounts.
///
/// The vault holds no private key; it signs for itself through its PDA seeds.
/// A `VaultSigner` can only be built by re-deriving the vault address from the
/// stored pool and bump, so holding one means the (address, bump) pairing has
/// been checked against the program id. Token CPIs take its [`seeds`] as
/// `signer_seeds`, and the host ledger's transfer primitive takes the value
/// itself.
///
/// [`seeds`]: VaultSigner::seeds
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VaultSigner {
    vault: Pubkey,
    dlmm_pool: Pubkey,
    bump: [u8; 1],
}

impl VaultSigner {
    pub fn verify(program_id: &Pubkey, vault_key: &Pubkey, vault: &FeeVault) -> Result<Self> {
        let derived = Pubkey::create_program_address(
            &[FEE_VAULT_SEED, vault.dlmm_pool.as_ref(), &[vault.bump]],
            program_id,
        )
        .map_err(|_| FeeVaultError::InvalidSeed)?;
        require_keys_eq!(derived, *vault_key, FeeVaultError::InvalidSeed);

        Ok(Self {
            vault: derived,
            dlmm_pool: vault.dlmm_pool,
            bump: [vault.bump],
        })
    }

    pub fn vault(&self) -> Pubkey {
        self.vault
    }

    pub fn seeds(&self) -> [&[u8]; 3] {
        [FEE_VAULT_SEED, self.dlmm_pool.as_ref(), &self.bump]
    }
}
