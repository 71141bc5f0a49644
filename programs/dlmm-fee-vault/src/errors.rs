use anchor_lang::prelude::*;

#[error_code]
pub enum FeeVaultError {
    #[msg("Account already exists at the derived address")]
    AlreadyExists,

    #[msg("Bump does not match the derived fee vault address")]
    InvalidSeed,

    #[msg("Unauthorized authority for this operation")]
    Unauthorized,

    #[msg("Insufficient custody balance for distribution")]
    InsufficientFunds,

    #[msg("Token account mint does not match the vault asset")]
    AssetMismatch,

    #[msg("Payer cannot fund rent-exempt storage")]
    StorageFundingFailure,

    #[msg("Custody account is not linked to this fee vault")]
    CustodyMismatch,

    #[msg("Math overflow")]
    MathOverflow,
}
