/// PDA seeds
pub const FEE_VAULT_SEED: &[u8] = b"fee_vault";
