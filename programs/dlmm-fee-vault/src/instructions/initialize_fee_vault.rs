use anchor_lang::prelude::*;
use anchor_spl::associated_token::AssociatedToken;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::{
    constants::*,
    events::FeeVaultInitialized,
    state::{FeeVault, NewFeeVault},
};

#[derive(Accounts)]
#[instruction(bump: u8)]
pub struct InitializeFeeVault<'info> {
    #[account(
        init,
        payer = payer,
        space = FeeVault::LEN,
        seeds = [FEE_VAULT_SEED, dlmm_pool.key().as_ref()],
        bump
    )]
    pub fee_vault: Account<'info, FeeVault>,

    /// The DLMM pool the vault is bound to
    /// CHECK: only its address is used as a seed
    pub dlmm_pool: UncheckedAccount<'info>,

    pub base_mint: Account<'info, Mint>,
    pub quote_mint: Account<'info, Mint>,

    /// Base custody ATA owned by the vault PDA
    #[account(
        init,
        payer = payer,
        associated_token::mint = base_mint,
        associated_token::authority = fee_vault,
    )]
    pub base_token_account: Account<'info, TokenAccount>,

    /// Quote custody ATA owned by the vault PDA
    #[account(
        init,
        payer = payer,
        associated_token::mint = quote_mint,
        associated_token::authority = fee_vault,
    )]
    pub quote_token_account: Account<'info, TokenAccount>,

    #[account(mut)]
    pub payer: Signer<'info>,

    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub rent: Sysvar<'info, Rent>,
}

pub fn initialize_fee_vault(
    ctx: Context<InitializeFeeVault>,
    bump: u8,
    authority: Pubkey,
) -> Result<()> {
    FeeVault::ensure_canonical_bump(bump, ctx.bumps.fee_vault)?;

    let dlmm_pool = ctx.accounts.dlmm_pool.key();
    let base_mint = ctx.accounts.base_mint.key();
    let quote_mint = ctx.accounts.quote_mint.key();
    let timestamp = Clock::get()?.unix_timestamp;

    ctx.accounts.fee_vault.set_inner(FeeVault::new(NewFeeVault {
        authority,
        dlmm_pool,
        base_mint,
        quote_mint,
        base_custody: ctx.accounts.base_token_account.key(),
        quote_custody: ctx.accounts.quote_token_account.key(),
        bump,
        creation_time: timestamp,
    }));

    emit!(FeeVaultInitialized {
        fee_vault: ctx.accounts.fee_vault.key(),
        dlmm_pool,
        authority,
        base_mint,
        quote_mint,
        timestamp,
    });

    msg!("Fee vault initialized for DLMM pool: {}", dlmm_pool);
    Ok(())
}
