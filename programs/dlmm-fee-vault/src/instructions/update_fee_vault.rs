use anchor_lang::prelude::*;

use crate::{constants::*, events::AuthorityUpdated, state::FeeVault};

#[derive(Accounts)]
pub struct UpdateFeeVault<'info> {
    #[account(
        mut,
        seeds = [FEE_VAULT_SEED, fee_vault.dlmm_pool.as_ref()],
        bump = fee_vault.bump,
    )]
    pub fee_vault: Account<'info, FeeVault>,

    pub authority: Signer<'info>,
}

pub fn update_fee_vault(ctx: Context<UpdateFeeVault>, new_authority: Option<Pubkey>) -> Result<()> {
    let fee_vault_key = ctx.accounts.fee_vault.key();
    let authority = ctx.accounts.authority.key();
    let fee_vault = &mut ctx.accounts.fee_vault;
    fee_vault.ensure_authority(&authority)?;

    if let Some(new_authority) = new_authority {
        let previous_authority = fee_vault.set_authority(new_authority);

        emit!(AuthorityUpdated {
            fee_vault: fee_vault_key,
            previous_authority,
            new_authority,
        });
        msg!("Fee vault authority updated to: {}", new_authority);
    }

    Ok(())
}
