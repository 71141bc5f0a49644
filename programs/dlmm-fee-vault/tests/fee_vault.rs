use anchor_lang::error::ERROR_CODE_OFFSET;
use anchor_lang::{AccountDeserialize, InstructionData, ToAccountMetas};
use dlmm_fee_vault::{errors::FeeVaultError, state::FeeVault};
use solana_program_test::{processor, BanksClientError, ProgramTest, ProgramTestContext};
use solana_sdk::{
    account_info::AccountInfo,
    entrypoint::ProgramResult,
    instruction::{Instruction, InstructionError},
    program_pack::Pack,
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    system_instruction, system_program, sysvar,
    transaction::{Transaction, TransactionError},
};
use spl_associated_token_account::{
    get_associated_token_address, instruction::create_associated_token_account,
};

fn process_instruction(program_id: &Pubkey, accounts: &[AccountInfo], data: &[u8]) -> ProgramResult {
    let accounts = Box::leak(Box::new(accounts.to_vec()));
    dlmm_fee_vault::entry(program_id, accounts, data)
}

fn error_code(error: FeeVaultError) -> u32 {
    ERROR_CODE_OFFSET + error as u32
}

fn custom_code(err: BanksClientError) -> u32 {
    match err.unwrap() {
        TransactionError::InstructionError(_, InstructionError::Custom(code)) => code,
        other => panic!("unexpected transaction error: {other:?}"),
    }
}

struct Harness {
    context: ProgramTestContext,
    authority: Keypair,
    dlmm_pool: Pubkey,
    base_mint: Pubkey,
    quote_mint: Pubkey,
    fee_vault: Pubkey,
    bump: u8,
}

/// Distribution accounts for one recipient.
struct Payout {
    recipient: Pubkey,
    recipient_base: Pubkey,
    recipient_quote: Pubkey,
}

impl Harness {
    async fn new() -> Self {
        let program = ProgramTest::new(
            "dlmm_fee_vault",
            dlmm_fee_vault::ID,
            processor!(process_instruction),
        );
        let context = program.start_with_context().await;
        let dlmm_pool = Pubkey::new_unique();
        let (fee_vault, bump) = FeeVault::derive_address(&dlmm_pool, &dlmm_fee_vault::ID);

        let mut harness = Self {
            context,
            authority: Keypair::new(),
            dlmm_pool,
            base_mint: Pubkey::default(),
            quote_mint: Pubkey::default(),
            fee_vault,
            bump,
        };
        harness.base_mint = harness.create_mint().await;
        harness.quote_mint = harness.create_mint().await;
        harness
    }

    async fn initialized() -> Self {
        let mut harness = Self::new().await;
        let authority = harness.authority.pubkey();
        let ix = harness.initialize_ix(harness.bump, authority);
        harness.send(&[ix], &[]).await.unwrap();
        harness
    }

    /// Custody funded with 1 base and 2 quote tokens (6 decimals).
    async fn funded() -> (Self, Payout) {
        let mut harness = Self::initialized().await;
        let base_custody = get_associated_token_address(&harness.fee_vault, &harness.base_mint);
        let quote_custody = get_associated_token_address(&harness.fee_vault, &harness.quote_mint);
        harness.mint_to(harness.base_mint, base_custody, 1_000_000).await;
        harness.mint_to(harness.quote_mint, quote_custody, 2_000_000).await;

        let recipient = Pubkey::new_unique();
        let recipient_base = harness.create_ata(&recipient, harness.base_mint).await;
        let recipient_quote = harness.create_ata(&recipient, harness.quote_mint).await;
        (
            harness,
            Payout {
                recipient,
                recipient_base,
                recipient_quote,
            },
        )
    }

    fn payer(&self) -> Pubkey {
        self.context.payer.pubkey()
    }

    async fn send(
        &mut self,
        instructions: &[Instruction],
        signers: &[&Keypair],
    ) -> Result<(), BanksClientError> {
        let payer = self.context.payer.insecure_clone();
        let blockhash = self.context.banks_client.get_latest_blockhash().await?;
        let mut all_signers = vec![&payer];
        all_signers.extend_from_slice(signers);

        let tx = Transaction::new_signed_with_payer(
            instructions,
            Some(&payer.pubkey()),
            &all_signers,
            blockhash,
        );
        self.context.banks_client.process_transaction(tx).await
    }

    async fn create_mint(&mut self) -> Pubkey {
        let mint = Keypair::new();
        let payer = self.payer();
        let rent = self.context.banks_client.get_rent().await.unwrap();
        let instructions = [
            system_instruction::create_account(
                &payer,
                &mint.pubkey(),
                rent.minimum_balance(spl_token::state::Mint::LEN),
                spl_token::state::Mint::LEN as u64,
                &spl_token::id(),
            ),
            spl_token::instruction::initialize_mint(&spl_token::id(), &mint.pubkey(), &payer, None, 6)
                .unwrap(),
        ];
        self.send(&instructions, &[&mint]).await.unwrap();
        mint.pubkey()
    }

    async fn create_ata(&mut self, wallet: &Pubkey, mint: Pubkey) -> Pubkey {
        let ix = create_associated_token_account(&self.payer(), wallet, &mint, &spl_token::id());
        self.send(&[ix], &[]).await.unwrap();
        get_associated_token_address(wallet, &mint)
    }

    async fn mint_to(&mut self, mint: Pubkey, account: Pubkey, amount: u64) {
        let payer = self.payer();
        let ix = spl_token::instruction::mint_to(&spl_token::id(), &mint, &account, &payer, &[], amount)
            .unwrap();
        self.send(&[ix], &[]).await.unwrap();
    }

    async fn balance(&mut self, account: Pubkey) -> u64 {
        let account = self
            .context
            .banks_client
            .get_account(account)
            .await
            .unwrap()
            .unwrap();
        spl_token::state::Account::unpack(&account.data).unwrap().amount
    }

    async fn vault(&mut self) -> FeeVault {
        let account = self
            .context
            .banks_client
            .get_account(self.fee_vault)
            .await
            .unwrap()
            .unwrap();
        FeeVault::try_deserialize(&mut account.data.as_slice()).unwrap()
    }

    fn custody(&self) -> (Pubkey, Pubkey) {
        (
            get_associated_token_address(&self.fee_vault, &self.base_mint),
            get_associated_token_address(&self.fee_vault, &self.quote_mint),
        )
    }

    fn initialize_ix(&self, bump: u8, authority: Pubkey) -> Instruction {
        let (base_token_account, quote_token_account) = self.custody();
        Instruction {
            program_id: dlmm_fee_vault::ID,
            accounts: dlmm_fee_vault::accounts::InitializeFeeVault {
                fee_vault: self.fee_vault,
                dlmm_pool: self.dlmm_pool,
                base_mint: self.base_mint,
                quote_mint: self.quote_mint,
                base_token_account,
                quote_token_account,
                payer: self.payer(),
                system_program: system_program::id(),
                token_program: spl_token::id(),
                associated_token_program: spl_associated_token_account::id(),
                rent: sysvar::rent::id(),
            }
            .to_account_metas(None),
            data: dlmm_fee_vault::instruction::InitializeFeeVault { bump, authority }.data(),
        }
    }

    fn distribute_ix(
        &self,
        authority: Pubkey,
        custody: (Pubkey, Pubkey),
        payout: &Payout,
        base_amount: u64,
        quote_amount: u64,
    ) -> Instruction {
        Instruction {
            program_id: dlmm_fee_vault::ID,
            accounts: dlmm_fee_vault::accounts::DistributeFees {
                fee_vault: self.fee_vault,
                base_token_account: custody.0,
                quote_token_account: custody.1,
                recipient_base_account: payout.recipient_base,
                recipient_quote_account: payout.recipient_quote,
                recipient: payout.recipient,
                authority,
                token_program: spl_token::id(),
            }
            .to_account_metas(None),
            data: dlmm_fee_vault::instruction::DistributeFees {
                base_amount,
                quote_amount,
            }
            .data(),
        }
    }

    fn update_ix(&self, authority: Pubkey, new_authority: Option<Pubkey>) -> Instruction {
        Instruction {
            program_id: dlmm_fee_vault::ID,
            accounts: dlmm_fee_vault::accounts::UpdateFeeVault {
                fee_vault: self.fee_vault,
                authority,
            }
            .to_account_metas(None),
            data: dlmm_fee_vault::instruction::UpdateFeeVault { new_authority }.data(),
        }
    }

    async fn balances(&mut self, payout: &Payout) -> [u64; 4] {
        let (base_custody, quote_custody) = self.custody();
        [
            self.balance(base_custody).await,
            self.balance(quote_custody).await,
            self.balance(payout.recipient_base).await,
            self.balance(payout.recipient_quote).await,
        ]
    }
}

#[tokio::test]
async fn initialize_records_vault_and_custody() {
    let mut harness = Harness::initialized().await;
    let vault = harness.vault().await;
    let (base_custody, quote_custody) = harness.custody();

    assert_eq!(vault.authority, harness.authority.pubkey());
    assert_eq!(vault.dlmm_pool, harness.dlmm_pool);
    assert_eq!(vault.base_mint, harness.base_mint);
    assert_eq!(vault.quote_mint, harness.quote_mint);
    assert_eq!(vault.base_custody, base_custody);
    assert_eq!(vault.quote_custody, quote_custody);
    assert_eq!(vault.bump, harness.bump);
    assert_eq!(vault.total_collected_base, 0);
    assert_eq!(vault.total_collected_quote, 0);
    assert!(vault.creation_time > 0);

    assert_eq!(harness.balance(base_custody).await, 0);
    assert_eq!(harness.balance(quote_custody).await, 0);
}

#[tokio::test]
async fn second_vault_for_same_pool_is_rejected() {
    let mut harness = Harness::initialized().await;
    let before = harness.vault().await;

    let intruder = Pubkey::new_unique();
    let ix = harness.initialize_ix(harness.bump, intruder);
    assert!(harness.send(&[ix], &[]).await.is_err());

    assert_eq!(harness.vault().await, before);
}

#[tokio::test]
async fn non_canonical_bump_is_rejected() {
    let mut harness = Harness::new().await;
    let authority = harness.authority.pubkey();
    let ix = harness.initialize_ix(harness.bump.wrapping_sub(1), authority);

    let err = harness.send(&[ix], &[]).await.unwrap_err();
    assert_eq!(custom_code(err), error_code(FeeVaultError::InvalidSeed));

    let account = harness
        .context
        .banks_client
        .get_account(harness.fee_vault)
        .await
        .unwrap();
    assert!(account.is_none());
}

#[tokio::test]
async fn authority_distributes_fees() {
    let (mut harness, payout) = Harness::funded().await;
    let authority = harness.authority.insecure_clone();
    let ix = harness.distribute_ix(authority.pubkey(), harness.custody(), &payout, 500_000, 1_000_000);

    harness.send(&[ix], &[&authority]).await.unwrap();

    assert_eq!(
        harness.balances(&payout).await,
        [500_000, 1_000_000, 500_000, 1_000_000]
    );
    let vault = harness.vault().await;
    assert_eq!(vault.total_collected_base, 0);
    assert_eq!(vault.total_collected_quote, 0);
}

#[tokio::test]
async fn zero_amount_distribution_moves_nothing() {
    let (mut harness, payout) = Harness::funded().await;
    let authority = harness.authority.insecure_clone();
    let ix = harness.distribute_ix(authority.pubkey(), harness.custody(), &payout, 0, 0);

    harness.send(&[ix], &[&authority]).await.unwrap();

    assert_eq!(harness.balances(&payout).await, [1_000_000, 2_000_000, 0, 0]);
}

#[tokio::test]
async fn non_authority_cannot_distribute() {
    let (mut harness, payout) = Harness::funded().await;
    let intruder = Keypair::new();
    let ix = harness.distribute_ix(intruder.pubkey(), harness.custody(), &payout, 1, 1);

    let err = harness.send(&[ix], &[&intruder]).await.unwrap_err();
    assert_eq!(custom_code(err), error_code(FeeVaultError::Unauthorized));
    assert_eq!(harness.balances(&payout).await, [1_000_000, 2_000_000, 0, 0]);
}

#[tokio::test]
async fn foreign_custody_account_is_rejected() {
    let (mut harness, payout) = Harness::funded().await;
    let authority = harness.authority.insecure_clone();
    let decoy_owner = Pubkey::new_unique();
    let decoy = harness.create_ata(&decoy_owner, harness.base_mint).await;
    harness.mint_to(harness.base_mint, decoy, 10).await;

    let (_, quote_custody) = harness.custody();
    let ix = harness.distribute_ix(authority.pubkey(), (decoy, quote_custody), &payout, 10, 0);

    let err = harness.send(&[ix], &[&authority]).await.unwrap_err();
    assert_eq!(custom_code(err), error_code(FeeVaultError::CustodyMismatch));
    assert_eq!(harness.balance(decoy).await, 10);
}

#[tokio::test]
async fn overdraw_fails_without_moving_either_leg() {
    let (mut harness, payout) = Harness::funded().await;
    let authority = harness.authority.insecure_clone();
    let ix = harness.distribute_ix(authority.pubkey(), harness.custody(), &payout, 1, 2_000_001);

    let err = harness.send(&[ix], &[&authority]).await.unwrap_err();
    assert_eq!(custom_code(err), error_code(FeeVaultError::InsufficientFunds));
    assert_eq!(harness.balances(&payout).await, [1_000_000, 2_000_000, 0, 0]);
}

#[tokio::test]
async fn rotated_authority_takes_over() {
    let (mut harness, payout) = Harness::funded().await;
    let old_authority = harness.authority.insecure_clone();
    let new_authority = Keypair::new();

    let ix = harness.update_ix(old_authority.pubkey(), Some(new_authority.pubkey()));
    harness.send(&[ix], &[&old_authority]).await.unwrap();
    assert_eq!(harness.vault().await.authority, new_authority.pubkey());

    let ix = harness.distribute_ix(old_authority.pubkey(), harness.custody(), &payout, 1, 0);
    let err = harness.send(&[ix], &[&old_authority]).await.unwrap_err();
    assert_eq!(custom_code(err), error_code(FeeVaultError::Unauthorized));

    let ix = harness.distribute_ix(new_authority.pubkey(), harness.custody(), &payout, 1, 0);
    harness.send(&[ix], &[&new_authority]).await.unwrap();
    assert_eq!(harness.balances(&payout).await, [999_999, 2_000_000, 1, 0]);
}

#[tokio::test]
async fn non_authority_cannot_update() {
    let mut harness = Harness::initialized().await;
    let intruder = Keypair::new();

    let ix = harness.update_ix(intruder.pubkey(), Some(intruder.pubkey()));
    let err = harness.send(&[ix], &[&intruder]).await.unwrap_err();

    assert_eq!(custom_code(err), error_code(FeeVaultError::Unauthorized));
    assert_eq!(harness.vault().await.authority, harness.authority.pubkey());
}
