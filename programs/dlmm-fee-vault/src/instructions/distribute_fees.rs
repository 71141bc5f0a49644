use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::{
    constants::*,
    custody::VaultSigner,
    distribution::{validate_distribution, DistributionLeg},
    events::FeesDistributed,
    state::FeeVault,
};

#[derive(Accounts)]
pub struct DistributeFees<'info> {
    #[account(
        seeds = [FEE_VAULT_SEED, fee_vault.dlmm_pool.as_ref()],
        bump = fee_vault.bump,
    )]
    pub fee_vault: Account<'info, FeeVault>,

    /// Base custody ATA
    #[account(mut)]
    pub base_token_account: Account<'info, TokenAccount>,

    /// Quote custody ATA
    #[account(mut)]
    pub quote_token_account: Account<'info, TokenAccount>,

    #[account(mut)]
    pub recipient_base_account: Account<'info, TokenAccount>,

    #[account(mut)]
    pub recipient_quote_account: Account<'info, TokenAccount>,

    /// CHECK: fee recipient, recorded in the event only
    pub recipient: UncheckedAccount<'info>,

    pub authority: Signer<'info>,
    pub token_program: Program<'info, Token>,
}

pub fn distribute_fees(
    ctx: Context<DistributeFees>,
    base_amount: u64,
    quote_amount: u64,
) -> Result<()> {
    let fee_vault = &ctx.accounts.fee_vault;
    fee_vault.ensure_authority(&ctx.accounts.authority.key())?;
    fee_vault.ensure_custody(
        &ctx.accounts.base_token_account.key(),
        &ctx.accounts.quote_token_account.key(),
    )?;

    let base_leg = DistributionLeg {
        custody_mint: ctx.accounts.base_token_account.mint,
        custody_amount: ctx.accounts.base_token_account.amount,
        recipient_mint: ctx.accounts.recipient_base_account.mint,
        amount: base_amount,
    };
    let quote_leg = DistributionLeg {
        custody_mint: ctx.accounts.quote_token_account.mint,
        custody_amount: ctx.accounts.quote_token_account.amount,
        recipient_mint: ctx.accounts.recipient_quote_account.mint,
        amount: quote_amount,
    };
    validate_distribution(fee_vault, &base_leg, &quote_leg)?;

    let vault_signer = VaultSigner::verify(ctx.program_id, &fee_vault.key(), fee_vault)?;
    let seeds = vault_signer.seeds();
    let signer = &[&seeds[..]];

    if base_amount > 0 {
        token::transfer(
            CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.base_token_account.to_account_info(),
                    to: ctx.accounts.recipient_base_account.to_account_info(),
                    authority: fee_vault.to_account_info(),
                },
                signer,
            ),
            base_amount,
        )?;
    }

    if quote_amount > 0 {
        token::transfer(
            CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.quote_token_account.to_account_info(),
                    to: ctx.accounts.recipient_quote_account.to_account_info(),
                    authority: fee_vault.to_account_info(),
                },
                signer,
            ),
            quote_amount,
        )?;
    }

    emit!(FeesDistributed {
        fee_vault: fee_vault.key(),
        recipient: ctx.accounts.recipient.key(),
        base_amount,
        quote_amount,
        timestamp: Clock::get()?.unix_timestamp,
    });

    msg!(
        "Distributed fees to {}: Base {}, Quote {}",
        ctx.accounts.recipient.key(),
        base_amount,
        quote_amount
    );

    Ok(())
}
