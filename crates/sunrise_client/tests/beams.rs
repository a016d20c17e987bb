mod common;

use std::sync::Arc;

use anchor_lang::AnchorSerialize;
use anchor_spl::{
    associated_token::{self, get_associated_token_address_with_program_id},
    token::spl_token,
};
use async_trait::async_trait;
use mockall::mock;
use solana_sdk::{account::Account, pubkey::Pubkey, signature::Signature};
use sunrise_client::{
    beams::{
        liquidity_pool::LiquidityPoolState, BeamAdapter, BeamCapability, LiquidityPoolAccounts,
        LiquidityPoolBeam, StakePoolBeam,
    },
    core::CoreClient,
    error::{ClientError, ClientResult, PreconditionError},
    ledger::{AccountFilter, Ledger, PendingTransaction},
};

use common::{beam, install_core, mint_data, InMemoryLedger};

mock! {
    pub Chain {}

    #[async_trait]
    impl Ledger for Chain {
        fn payer(&self) -> Pubkey;
        async fn fetch_account(&self, address: &Pubkey) -> ClientResult<Option<Account>>;
        async fn fetch_multiple_accounts(
            &self,
            addresses: &[Pubkey],
        ) -> ClientResult<Vec<Option<Account>>>;
        async fn fetch_program_accounts(
            &self,
            program_id: &Pubkey,
            filters: Vec<AccountFilter>,
        ) -> ClientResult<Vec<(Pubkey, Account)>>;
        async fn current_epoch(&self) -> ClientResult<u64>;
        async fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> ClientResult<u64>;
        async fn submit(&self, transaction: PendingTransaction) -> ClientResult<Signature>;
    }
}

fn pool_accounts() -> LiquidityPoolAccounts {
    LiquidityPoolAccounts {
        program_id: Pubkey::new_unique(),
        state: Pubkey::new_unique(),
        pool_state: Pubkey::new_unique(),
        pool_program: Pubkey::new_unique(),
        lp_mint: Pubkey::new_unique(),
        lp_mint_authority: Pubkey::new_unique(),
        lp_token_vault: Pubkey::new_unique(),
        sol_leg: Pubkey::new_unique(),
        token_leg: Pubkey::new_unique(),
        token_leg_authority: Pubkey::new_unique(),
    }
}

fn pool_state_data(accounts: &LiquidityPoolAccounts, sunrise_state: Pubkey) -> Vec<u8> {
    let state = LiquidityPoolState {
        update_authority: Pubkey::new_unique(),
        pool_state: accounts.pool_state,
        sunrise_state,
        gsol_mint: Pubkey::new_unique(),
        vault_authority_bump: 255,
        treasury: Pubkey::new_unique(),
        token_account: Pubkey::new_unique(),
    };
    let mut data = vec![0u8; 8];
    state.serialize(&mut data).unwrap();
    data
}

#[tokio::test]
async fn unsupported_capabilities_fail_before_touching_the_ledger() {
    // a mock without expectations panics on any call
    let chain: Arc<dyn Ledger> = Arc::new(MockChain::new());
    let core = Arc::new(CoreClient::new(chain, Pubkey::new_unique()));
    let accounts = pool_accounts();
    let lp = LiquidityPoolBeam::new(core, accounts);

    let err = lp.order_withdraw(1_000).await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Precondition(PreconditionError::CapabilityNotSupported {
            beam,
            capability: BeamCapability::OrderUnstake,
        }) if beam == accounts.state
    ));

    let err = lp
        .deposit_stake(Pubkey::new_unique(), None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ClientError::Precondition(PreconditionError::CapabilityNotSupported {
            capability: BeamCapability::StakeDeposit,
            ..
        })
    ));

    assert!(lp.withdraw_stake(1_000).await.is_err());
    assert!(matches!(
        lp.extract_yield().await.unwrap_err(),
        ClientError::Precondition(PreconditionError::OperationNotSupported {
            operation: "extract_yield",
            ..
        })
    ));
    assert!(matches!(
        lp.deposit(0, None).await.unwrap_err(),
        ClientError::Precondition(PreconditionError::ZeroAmount)
    ));
}

#[tokio::test]
async fn liquidity_pool_beam_deposits_through_its_program() {
    let payer = Pubkey::new_unique();
    let ledger = InMemoryLedger::new(payer);
    let accounts = pool_accounts();
    let fixture = install_core(&ledger, &[beam(accounts.state, 100, 0)], 0, 0);
    ledger.set_account(
        accounts.state,
        accounts.program_id,
        pool_state_data(&accounts, fixture.state),
    );

    let core = Arc::new(CoreClient::new(ledger.clone(), fixture.state));
    let lp = LiquidityPoolBeam::new(core, accounts);

    let view = lp.refresh(3).await.unwrap();
    assert_eq!(view.generation(), 3);
    assert_eq!(view.proxy_state, accounts.pool_state);
    assert!(view.capabilities.supports(BeamCapability::SolDeposit));
    assert!(view.capabilities.supports(BeamCapability::LiquidUnstake));
    assert_eq!(view.position_value, None);

    lp.deposit(2_000_000, None).await.unwrap();

    let submitted = ledger.submitted();
    assert_eq!(submitted.len(), 1);
    let instructions = &submitted[0];
    assert_eq!(instructions.len(), 2);
    assert_eq!(instructions[0].program_id, associated_token::ID);

    let deposit = &instructions[1];
    assert_eq!(deposit.program_id, accounts.program_id);
    assert_eq!(deposit.data.len(), 16);
    assert_eq!(&deposit.data[8..], &2_000_000u64.to_le_bytes()[..]);
    assert_eq!(deposit.accounts[0].pubkey, accounts.state);
    assert!(deposit.accounts[0].is_writable);
    assert!(deposit
        .accounts
        .iter()
        .any(|meta| meta.pubkey == accounts.pool_state && meta.is_writable));
    assert!(deposit
        .accounts
        .iter()
        .any(|meta| meta.pubkey == payer && meta.is_signer));
}

#[tokio::test]
async fn foreign_state_account_is_rejected() {
    let ledger = InMemoryLedger::new(Pubkey::new_unique());
    let accounts = pool_accounts();
    let fixture = install_core(&ledger, &[], 0, 0);
    ledger.set_account(
        accounts.state,
        Pubkey::new_unique(),
        pool_state_data(&accounts, fixture.state),
    );

    let core = Arc::new(CoreClient::new(ledger.clone(), fixture.state));
    let lp = LiquidityPoolBeam::new(core, accounts);

    assert!(matches!(
        lp.refresh(1).await.unwrap_err(),
        ClientError::Decode { account, .. } if account == accounts.state
    ));
}

#[tokio::test]
async fn stake_pool_beam_keeps_pool_and_gsol_token_programs_apart() {
    let payer = Pubkey::new_unique();
    let ledger = InMemoryLedger::new(payer);
    let fixture = install_core(&ledger, &[], 0, 0);
    let core = Arc::new(CoreClient::new(ledger.clone(), fixture.state));

    // gSOL lives under a different token program than the pool tokens
    let gsol_token_program = Pubkey::new_unique();
    ledger.set_account(fixture.gsol_mint, gsol_token_program, mint_data(0, Pubkey::new_unique()));

    let stake_pool = Pubkey::new_unique();
    let pool = spl_stake_pool::state::StakePool {
        token_program_id: spl_token::ID,
        pool_mint: Pubkey::new_unique(),
        reserve_stake: Pubkey::new_unique(),
        manager_fee_account: Pubkey::new_unique(),
        ..Default::default()
    };
    ledger.set_account(stake_pool, spl_stake_pool::ID, pool.try_to_vec().unwrap());

    let beam = StakePoolBeam::new(core, stake_pool);
    beam.deposit(1_000_000, None).await.unwrap();

    let submitted = ledger.submitted();
    let instructions = &submitted[0];
    assert_eq!(instructions[0].program_id, associated_token::ID);
    assert!(instructions[0]
        .accounts
        .iter()
        .any(|meta| meta.pubkey == gsol_token_program));

    let deposit = &instructions[1];
    assert_eq!(deposit.program_id, spl_beam::ID);
    assert_eq!(deposit.accounts.len(), 19);
    assert_eq!(
        deposit.accounts[4].pubkey,
        get_associated_token_address_with_program_id(&payer, &fixture.gsol_mint, &gsol_token_program)
    );
    assert_eq!(deposit.accounts[17].pubkey, spl_token::ID);
    assert_eq!(deposit.accounts[18].pubkey, gsol_token_program);
}
