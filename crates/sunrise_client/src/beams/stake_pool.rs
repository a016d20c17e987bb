//! Client for the SPL stake pool beam

use std::num::NonZeroU32;
use std::sync::Arc;

use anchor_lang::solana_program::borsh0_10::try_from_slice_unchecked;
use anchor_spl::{
    associated_token::{
self, get_associated_token_address_with_program_id},
    token_interface::TokenAccount,
};
use async_trait::async_trait;
use spl_associated_token_account::instruction::create_associated_token_account_idempotent;
use solana_sdk::{
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
    stake::{self, state::StakeStateV2},
    system_instruction, system_program, sysvar,
};
use spl_beam::{
    accounts as beam_accounts, instruction as beam_ix,
    state::{BeamState, BeamStateInput, ProxyTicket, STATE_SEED, TICKET_SEED, VAULT_AUTHORITY_SEED},
    utils::pool::{lamports_from_pool_tokens, StakePool},
};
use spl_stake_pool::state::ValidatorList;
use tracing::info;

use super::{
    require_positive, BeamAdapter, BeamCapability, BeamUpdate, BeamView, CapabilitySet,
    OrderedWithdrawal, WithdrawnStake,
};
use crate::{
    core::{build_instruction, CoreClient, CoreView},
    error::{ClientError, ClientResult, PreconditionError},
    ledger::{decode_anchor, fetch_anchor, fetch_required, PendingTransaction, SharedLedger},
    snapshot::Snapshot,
};

pub fn beam_state_address(sunrise_state: &Pubkey, stake_pool: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[STATE_SEED, sunrise_state.as_ref(), stake_pool.as_ref()],
        &spl_beam::ID,
    )
}

pub fn vault_authority_address(beam_state: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[beam_state.as_ref(), VAULT_AUTHORITY_SEED], &spl_beam::ID)
}

pub fn ticket_address(stake_account: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[TICKET_SEED, stake_account.as_ref()], &spl_beam::ID)
}

/// A validator stake account of the pool and the stake it holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatorCandidate {
    pub stake_account: Pubkey,
    pub active_lamports: u64,
}

/// The pool splits withdrawals from its largest validator while that one can cover the
/// amount and keep its minimum active stake, and from the reserve otherwise.
pub fn select_stake_to_split(
    validators: &[ValidatorCandidate],
    lamports: u64,
    reserve: Pubkey,
) -> Pubkey {
    validators
        .iter()
        .max_by_key(|v| v.active_lamports)
        .filter(|v| {
            v.active_lamports
                .checked_sub(spl_stake_pool::MINIMUM_ACTIVE_STAKE)
                .map_or(false, |spare| spare >= lamports)
        })
        .map_or(reserve, |v| v.stake_account)
}

/// Everything an instruction of this beam needs, read in one go
struct BeamContext {
    core: CoreView,
    pool: StakePool,
    vault_authority: Pubkey,
    pool_token_vault: Pubkey,
    withdraw_authority: Pubkey,
}

pub struct StakePoolBeam {
    ledger: SharedLedger,
    core: Arc<CoreClient>,
    stake_pool: Pubkey,
    state: Pubkey,
}

impl StakePoolBeam {
    const CAPABILITIES: [BeamCapability; 5] = [
        BeamCapability::SolDeposit,
        BeamCapability::StakeDeposit,
        BeamCapability::LiquidUnstake,
        BeamCapability::OrderUnstake,
        BeamCapability::StakeWithdrawal,
    ];

    pub fn new(core: Arc<CoreClient>, stake_pool: Pubkey) -> Self {
        let state = beam_state_address(&core.address(), &stake_pool).0;
        Self {
            ledger: core.ledger().clone(),
            core,
            stake_pool,
            state,
        }
    }

    /// Creates the beam state for `stake_pool`. The beam still needs to be registered
    /// in the core before it can mint.
    pub async fn initialize(
        core: Arc<CoreClient>,
        stake_pool: Pubkey,
        input: BeamStateInput,
    ) -> ClientResult<(Self, Signature)> {
        let beam = Self::new(core, stake_pool);
        let pool: StakePool = fetch_anchor(beam.ledger.as_ref(), &stake_pool).await?;
        let vault_authority = vault_authority_address(&beam.state).0;

        let ix = build_instruction(
            spl_beam::ID,
            beam_accounts::Initialize {
                payer: beam.ledger.payer(),
                state: beam.state,
                sunrise_state: beam.core.address(),
                stake_pool,
                pool_mint: pool.pool_mint,
                vault_authority,
                pool_token_vault: get_associated_token_address_with_program_id(
                    &vault_authority,
                    &pool.pool_mint,
                    &pool.token_program_id,
                ),
                token_program: pool.token_program_id,
                associated_token_program: associated_token::ID,
                system_program: system_program::ID,
            },
            beam_ix::Initialize { input },
        );

        let signature = beam.ledger.submit(PendingTransaction::new(vec![ix])).await?;
        info!(target: "sunrise::beam", beam = %beam.state, %stake_pool, %signature, "initialized stake pool beam");

        Ok((beam, signature))
    }

    pub fn stake_pool(&self) -> Pubkey {
        self.stake_pool
    }

    async fn context(&self) -> ClientResult<BeamContext> {
        let ledger = self.ledger.as_ref();
        let core = self.core.view().await?;
        let pool: StakePool = fetch_anchor(ledger, &self.stake_pool).await?;

        let vault_authority = vault_authority_address(&self.state).0;
        let pool_token_vault = get_associated_token_address_with_program_id(
            &vault_authority,
            &pool.pool_mint,
            &pool.token_program_id,
        );
        let withdraw_authority = spl_stake_pool::find_withdraw_authority_program_address(
            &spl_stake_pool::ID,
            &self.stake_pool,
        )
        .0;

        Ok(BeamContext {
            core,
            pool,
            vault_authority,
            pool_token_vault,
            withdraw_authority,
        })
    }

    async fn validator_list(&self, ctx: &BeamContext) -> ClientResult<ValidatorList> {
        let account = fetch_required(self.ledger.as_ref(), &ctx.pool.validator_list).await?;
        try_from_slice_unchecked::<ValidatorList>(&account.data)
            .map_err(|e| ClientError::decode(ctx.pool.validator_list, e))
    }

    fn validator_stake_account(&self, vote_account: &Pubkey, seed: u32) -> Pubkey {
        spl_stake_pool::find_stake_program_address(
            &spl_stake_pool::ID,
            vote_account,
            &self.stake_pool,
            NonZeroU32::new(seed),
        )
        .0
    }

    async fn stake_to_split(&self, ctx: &BeamContext, lamports: u64) -> ClientResult<Pubkey> {
        let list = self.validator_list(ctx).await?;
        let candidates: Vec<ValidatorCandidate> = list
            .validators
            .iter()
            .map(|info| ValidatorCandidate {
                stake_account: self.validator_stake_account(
                    &info.vote_account_address,
                    u32::from(info.validator_seed_suffix),
                ),
                active_lamports: u64::from(info.active_stake_lamports),
            })
            .collect();

        Ok(select_stake_to_split(
            &candidates,
            lamports,
            ctx.pool.reserve_stake,
        ))
    }

    /// Instructions allocating an empty stake account for the pool to split into
    async fn create_stake_account(&self, stake_account: &Keypair) -> ClientResult<Instruction> {
        let space = StakeStateV2::size_of();
        let rent = self
            .ledger
            .minimum_balance_for_rent_exemption(space)
            .await?;

        Ok(system_instruction::create_account(
            &self.ledger.payer(),
            &stake_account.pubkey(),
            rent,
            space as u64,
            &stake::program::ID,
        ))
    }

    fn create_gsol_account(&self, ctx: &BeamContext, owner: &Pubkey) -> Instruction {
        create_associated_token_account_idempotent(
            &self.ledger.payer(),
            owner,
            &ctx.core.state.gsol_mint,
            &ctx.core.token_program,
        )
    }

    async fn submit(&self, tx: PendingTransaction, action: &'static str, lamports: u64) -> ClientResult<Signature> {
        let signature = self.ledger.submit(tx).await?;
        info!(target: "sunrise::beam", beam = %self.state, action, lamports, %signature, "beam transaction confirmed");
        Ok(signature)
    }

    fn withdraw_stake_accounts(
        &self,
        ctx: &BeamContext,
        new_stake_account: Pubkey,
        stake_account_to_split: Pubkey,
    ) -> beam_accounts::WithdrawStake {
        let withdrawer = self.ledger.payer();
        beam_accounts::WithdrawStake {
            state: self.state,
            sunrise_state: ctx.core.address,
            stake_pool: self.stake_pool,
            withdrawer,
            gsol_token_account: ctx.core.gsol_token_account(&withdrawer),
            new_stake_account,
            pool_mint: ctx.pool.pool_mint,
            vault_authority: ctx.vault_authority,
            pool_token_vault: ctx.pool_token_vault,
            stake_pool_withdraw_authority: ctx.withdraw_authority,
            validator_list: ctx.pool.validator_list,
            stake_account_to_split,
            manager_fee_account: ctx.pool.manager_fee_account,
            clock: sysvar::clock::ID,
            gsol_mint: ctx.core.state.gsol_mint,
            instructions_sysvar: sysvar::instructions::ID,
            sunrise_program: sunrise_core::ID,
            stake_pool_program: spl_stake_pool::ID,
            native_stake_program: stake::program::ID,
            token_program: ctx.pool.token_program_id,
            gsol_token_program: ctx.core.token_program,
        }
    }

    /// Burns gSOL without redeeming it, leaving the backing SOL in the pool as yield
    pub async fn burn(&self, lamports: u64) -> ClientResult<Signature> {
        require_positive(lamports)?;
        let ctx = self.context().await?;
        let burner = self.ledger.payer();

        let ix = build_instruction(
            spl_beam::ID,
            beam_accounts::Burn {
                state: self.state,
                sunrise_state: ctx.core.address,
                stake_pool: self.stake_pool,
                burner,
                gsol_token_account: ctx.core.gsol_token_account(&burner),
                gsol_mint: ctx.core.state.gsol_mint,
                instructions_sysvar: sysvar::instructions::ID,
                sunrise_program: sunrise_core::ID,
                token_program: ctx.core.token_program,
            },
            beam_ix::Burn { lamports },
        );

        self.submit(PendingTransaction::new(vec![ix]), "burn", lamports)
            .await
    }
}

#[async_trait]
impl BeamAdapter for StakePoolBeam {
    fn key(&self) -> Pubkey {
        self.state
    }

    fn program_id(&self) -> Pubkey {
        spl_beam::ID
    }

    fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::of(&Self::CAPABILITIES)
    }

    async fn refresh(&self, generation: u64) -> ClientResult<Snapshot<BeamView>> {
        let ledger = self.ledger.as_ref();
        let state: BeamState = fetch_anchor(ledger, &self.state).await?;
        let pool: StakePool = fetch_anchor(ledger, &self.stake_pool).await?;

        let vault = get_associated_token_address_with_program_id(
            &vault_authority_address(&self.state).0,
            &pool.pool_mint,
            &pool.token_program_id,
        );
        let pool_tokens = match ledger.fetch_account(&vault).await? {
            Some(account) => decode_anchor::<TokenAccount>(&vault, &account.data)?.amount,
            None => 0,
        };
        let position_value = lamports_from_pool_tokens(&pool, pool_tokens)
            .map_err(|e| ClientError::decode(self.stake_pool, e))?;

        Ok(Snapshot::new(
            generation,
            BeamView {
                key: self.state,
                capabilities: self.capabilities(),
                proxy_state: state.stake_pool,
                treasury: state.treasury,
                position_value: Some(position_value),
            },
        ))
    }

    async fn update(&self, params: BeamUpdate) -> ClientResult<Signature> {
        let current: BeamState = fetch_anchor(self.ledger.as_ref(), &self.state).await?;
        let input = BeamStateInput {
            update_authority: params.update_authority.unwrap_or(current.update_authority),
            treasury: params.treasury.unwrap_or(current.treasury),
        };

        let ix = build_instruction(
            spl_beam::ID,
            beam_accounts::Update {
                update_authority: self.ledger.payer(),
                state: self.state,
            },
            beam_ix::Update { input },
        );

        self.submit(PendingTransaction::new(vec![ix]), "update", 0)
            .await
    }

    async fn deposit(&self, lamports: u64, recipient: Option<Pubkey>) -> ClientResult<Signature> {
        self.capabilities()
            .require(self.state, BeamCapability::SolDeposit)?;
        require_positive(lamports)?;

        let ctx = self.context().await?;
        let depositor = self.ledger.payer();
        let recipient = recipient.unwrap_or(depositor);
        let mint = ctx.core.mint_gsol_accounts(self.state, &recipient);

        let ix = build_instruction(
            spl_beam::ID,
            beam_accounts::Deposit {
                state: self.state,
                sunrise_state: mint.state,
                stake_pool: self.stake_pool,
                depositor,
                mint_gsol_to: mint.mint_gsol_to,
                pool_mint: ctx.pool.pool_mint,
                vault_authority: ctx.vault_authority,
                pool_token_vault: ctx.pool_token_vault,
                stake_pool_withdraw_authority: ctx.withdraw_authority,
                reserve_stake_account: ctx.pool.reserve_stake,
                manager_fee_account: ctx.pool.manager_fee_account,
                gsol_mint: mint.gsol_mint,
                gsol_mint_authority: mint.gsol_mint_authority,
                instructions_sysvar: mint.instructions_sysvar,
                sunrise_program: sunrise_core::ID,
                stake_pool_program: spl_stake_pool::ID,
                system_program: system_program::ID,
                token_program: ctx.pool.token_program_id,
                gsol_token_program: mint.token_program,
            },
            beam_ix::Deposit { lamports },
        );

        let tx = PendingTransaction::new(vec![self.create_gsol_account(&ctx, &recipient), ix]);
        self.submit(tx, "deposit", lamports).await
    }

    async fn deposit_stake(
        &self,
        stake_account: Pubkey,
        recipient: Option<Pubkey>,
    ) -> ClientResult<Signature> {
        self.capabilities()
            .require(self.state, BeamCapability::StakeDeposit)?;

        let stake = fetch_required(self.ledger.as_ref(), &stake_account).await?;
        let delegation = try_from_slice_unchecked::<StakeStateV2>(&stake.data)
            .map_err(|e| ClientError::decode(stake_account, e))?
            .delegation()
            .ok_or(PreconditionError::StakeNotDelegated(stake_account))?;

        let ctx = self.context().await?;
        let list = self.validator_list(&ctx).await?;
        let validator = list
            .validators
            .iter()
            .find(|info| info.vote_account_address == delegation.voter_pubkey)
            .ok_or_else(|| {
                ClientError::decode(
                    ctx.pool.validator_list,
                    format!("validator {} is not part of the pool", delegation.voter_pubkey),
                )
            })?;
        let validator_stake_account = self.validator_stake_account(
            &validator.vote_account_address,
            u32::from(validator.validator_seed_suffix),
        );

        let stake_owner = self.ledger.payer();
        let recipient = recipient.unwrap_or(stake_owner);
        let mint = ctx.core.mint_gsol_accounts(self.state, &recipient);

        let ix = build_instruction(
            spl_beam::ID,
            beam_accounts::DepositStake {
                state: self.state,
                sunrise_state: mint.state,
                stake_pool: self.stake_pool,
                stake_owner,
                stake_account,
                mint_gsol_to: mint.mint_gsol_to,
                pool_mint: ctx.pool.pool_mint,
                vault_authority: ctx.vault_authority,
                pool_token_vault: ctx.pool_token_vault,
                validator_list: ctx.pool.validator_list,
                stake_pool_deposit_authority: ctx.pool.stake_deposit_authority,
                stake_pool_withdraw_authority: ctx.withdraw_authority,
                reserve_stake_account: ctx.pool.reserve_stake,
                validator_stake_account,
                manager_fee_account: ctx.pool.manager_fee_account,
                clock: sysvar::clock::ID,
                stake_history: sysvar::stake_history::ID,
                gsol_mint: mint.gsol_mint,
                gsol_mint_authority: mint.gsol_mint_authority,
                instructions_sysvar: mint.instructions_sysvar,
                sunrise_program: sunrise_core::ID,
                stake_pool_program: spl_stake_pool::ID,
                native_stake_program: stake::program::ID,
                token_program: ctx.pool.token_program_id,
                gsol_token_program: mint.token_program,
            },
            beam_ix::DepositStake {},
        );

        let tx = PendingTransaction::new(vec![self.create_gsol_account(&ctx, &recipient), ix]);
        self.submit(tx, "deposit_stake", delegation.stake).await
    }

    async fn withdraw(&self, lamports: u64) -> ClientResult<Signature> {
        self.capabilities()
            .require(self.state, BeamCapability::LiquidUnstake)?;
        require_positive(lamports)?;

        let ctx = self.context().await?;
        let withdrawer = self.ledger.payer();
        let burn = ctx.core.burn_gsol_accounts(self.state, &withdrawer);

        let ix = build_instruction(
            spl_beam::ID,
            beam_accounts::Withdraw {
                state: self.state,
                sunrise_state: burn.state,
                stake_pool: self.stake_pool,
                withdrawer,
                gsol_token_account: burn.burn_gsol_from,
                pool_mint: ctx.pool.pool_mint,
                vault_authority: ctx.vault_authority,
                pool_token_vault: ctx.pool_token_vault,
                stake_pool_withdraw_authority: ctx.withdraw_authority,
                reserve_stake_account: ctx.pool.reserve_stake,
                manager_fee_account: ctx.pool.manager_fee_account,
                clock: sysvar::clock::ID,
                stake_history: sysvar::stake_history::ID,
                gsol_mint: burn.gsol_mint,
                instructions_sysvar: burn.instructions_sysvar,
                sunrise_program: sunrise_core::ID,
                stake_pool_program: spl_stake_pool::ID,
                native_stake_program: stake::program::ID,
                token_program: ctx.pool.token_program_id,
                gsol_token_program: burn.token_program,
            },
            beam_ix::Withdraw { lamports },
        );

        self.submit(PendingTransaction::new(vec![ix]), "withdraw", lamports)
            .await
    }

    async fn withdraw_stake(&self, lamports: u64) -> ClientResult<WithdrawnStake> {
        self.capabilities()
            .require(self.state, BeamCapability::StakeWithdrawal)?;
        require_positive(lamports)?;

        let ctx = self.context().await?;
        let stake_account_to_split = self.stake_to_split(&ctx, lamports).await?;
        let new_stake_account = Keypair::new();
        let stake_account = new_stake_account.pubkey();

        let ix = build_instruction(
            spl_beam::ID,
            self.withdraw_stake_accounts(&ctx, stake_account, stake_account_to_split),
            beam_ix::WithdrawStake { lamports },
        );

        let tx = PendingTransaction::new(vec![self.create_stake_account(&new_stake_account).await?, ix])
            .with_signer(new_stake_account);
        let signature = self.submit(tx, "withdraw_stake", lamports).await?;

        Ok(WithdrawnStake {
            signature,
            stake_account,
        })
    }

    async fn order_withdraw(&self, lamports: u64) -> ClientResult<OrderedWithdrawal> {
        self.capabilities()
            .require(self.state, BeamCapability::OrderUnstake)?;
        require_positive(lamports)?;

        let ctx = self.context().await?;
        let stake_account_to_split = self.stake_to_split(&ctx, lamports).await?;
        let new_stake_account = Keypair::new();
        let underlying_ticket = new_stake_account.pubkey();
        let ticket = ticket_address(&underlying_ticket).0;

        let split = self.withdraw_stake_accounts(&ctx, underlying_ticket, stake_account_to_split);
        let ix = build_instruction(
            spl_beam::ID,
            beam_accounts::OrderWithdrawal {
                state: split.state,
                sunrise_state: split.sunrise_state,
                stake_pool: split.stake_pool,
                withdrawer: split.withdrawer,
                gsol_token_account: split.gsol_token_account,
                new_stake_account: split.new_stake_account,
                ticket,
                pool_mint: split.pool_mint,
                vault_authority: split.vault_authority,
                pool_token_vault: split.pool_token_vault,
                stake_pool_withdraw_authority: split.stake_pool_withdraw_authority,
                validator_list: split.validator_list,
                stake_account_to_split: split.stake_account_to_split,
                manager_fee_account: split.manager_fee_account,
                clock: split.clock,
                gsol_mint: split.gsol_mint,
                instructions_sysvar: split.instructions_sysvar,
                sunrise_program: split.sunrise_program,
                stake_pool_program: split.stake_pool_program,
                native_stake_program: split.native_stake_program,
                system_program: system_program::ID,
                token_program: split.token_program,
                gsol_token_program: split.gsol_token_program,
            },
            beam_ix::OrderWithdrawal { lamports },
        );

        let tx = PendingTransaction::new(vec![self.create_stake_account(&new_stake_account).await?, ix])
            .with_signer(new_stake_account);
        let signature = self.submit(tx, "order_withdraw", lamports).await?;
        info!(target: "sunrise::ticket", %ticket, %underlying_ticket, lamports, "withdrawal ordered");

        Ok(OrderedWithdrawal {
            signature,
            ticket,
            underlying_ticket,
        })
    }

    async fn redeem_ticket(&self, ticket: Pubkey) -> ClientResult<Signature> {
        self.capabilities()
            .require(self.state, BeamCapability::OrderUnstake)?;

        let ledger = self.ledger.as_ref();
        let proxy_ticket: ProxyTicket = fetch_anchor(ledger, &ticket).await?;
        let state: BeamState = fetch_anchor(ledger, &self.state).await?;

        let ix = redeem_ticket_instruction(self.state, &state, ticket, &proxy_ticket);
        self.submit(PendingTransaction::new(vec![ix]), "redeem_ticket", proxy_ticket.lamports)
            .await
    }

    async fn update_epoch_report(&self) -> ClientResult<Signature> {
        let ctx = self.context().await?;

        let ix = build_instruction(
            spl_beam::ID,
            beam_accounts::UpdateEpochReport {
                state: self.state,
                sunrise_state: ctx.core.address,
                stake_pool: self.stake_pool,
                vault_authority: ctx.vault_authority,
                pool_token_vault: ctx.pool_token_vault,
                epoch_report: ctx.core.epoch_report_address(),
                gsol_mint: ctx.core.state.gsol_mint,
                instructions_sysvar: sysvar::instructions::ID,
                sunrise_program: sunrise_core::ID,
            },
            beam_ix::UpdateEpochReport {},
        );

        self.submit(PendingTransaction::new(vec![ix]), "update_epoch_report", 0)
            .await
    }

    async fn extract_yield(&self) -> ClientResult<Signature> {
        let ctx = self.context().await?;

        let ix = build_instruction(
            spl_beam::ID,
            beam_accounts::ExtractYield {
                state: self.state,
                sunrise_state: ctx.core.address,
                stake_pool: self.stake_pool,
                yield_account: ctx.core.state.yield_account,
                epoch_report: ctx.core.epoch_report_address(),
                pool_mint: ctx.pool.pool_mint,
                vault_authority: ctx.vault_authority,
                pool_token_vault: ctx.pool_token_vault,
                stake_pool_withdraw_authority: ctx.withdraw_authority,
                reserve_stake_account: ctx.pool.reserve_stake,
                manager_fee_account: ctx.pool.manager_fee_account,
                clock: sysvar::clock::ID,
                stake_history: sysvar::stake_history::ID,
                instructions_sysvar: sysvar::instructions::ID,
                sunrise_program: sunrise_core::ID,
                stake_pool_program: spl_stake_pool::ID,
                native_stake_program: stake::program::ID,
                token_program: ctx.pool.token_program_id,
            },
            beam_ix::ExtractYield {},
        );

        self.submit(PendingTransaction::new(vec![ix]), "extract_yield", 0)
            .await
    }
}

/// Builds the permissionless redemption of `ticket`. The submitter only pays fees.
pub fn redeem_ticket_instruction(
    beam: Pubkey,
    state: &BeamState,
    ticket: Pubkey,
    proxy_ticket: &ProxyTicket,
) -> Instruction {
    build_instruction(
        spl_beam::ID,
        beam_accounts::RedeemTicket {
            state: beam,
            ticket,
            beneficiary: proxy_ticket.beneficiary,
            treasury: state.treasury,
            stake_account: proxy_ticket.stake_account,
            vault_authority: vault_authority_address(&beam).0,
            clock: sysvar::clock::ID,
            stake_history: sysvar::stake_history::ID,
            native_stake_program: stake::program::ID,
            system_program: system_program::ID,
        },
        beam_ix::RedeemTicket {},
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(active_lamports: u64) -> ValidatorCandidate {
        ValidatorCandidate {
            stake_account: Pubkey::new_unique(),
            active_lamports,
        }
    }

    #[test]
    fn splits_from_largest_validator() {
        let reserve = Pubkey::new_unique();
        let small = candidate(5_000_000_000);
        let large = candidate(50_000_000_000);

        assert_eq!(
            select_stake_to_split(&[small, large], 10_000_000_000, reserve),
            large.stake_account
        );
    }

    #[test]
    fn falls_back_to_reserve() {
        let reserve = Pubkey::new_unique();
        let validator = candidate(2_000_000_000);

        assert_eq!(
            select_stake_to_split(&[validator], 2_000_000_000, reserve),
            reserve
        );
        assert_eq!(select_stake_to_split(&[], 1, reserve), reserve);
    }

    #[test]
    fn redemption_pays_beneficiary_and_treasury() {
        let beam = Pubkey::new_unique();
        let stake_account = Pubkey::new_unique();
        let ticket = ticket_address(&stake_account).0;
        let state = BeamState {
            treasury: Pubkey::new_unique(),
            ..Default::default()
        };
        let proxy_ticket = ProxyTicket {
            beam,
            stake_account,
            beneficiary: Pubkey::new_unique(),
            lamports: 1_000_000_000,
            unlock_epoch: 10,
            ..Default::default()
        };

        let ix = redeem_ticket_instruction(beam, &state, ticket, &proxy_ticket);
        let keys: Vec<Pubkey> = ix.accounts.iter().map(|meta| meta.pubkey).collect();

        assert_eq!(ix.program_id, spl_beam::ID);
        assert_eq!(keys[0], beam);
        assert_eq!(keys[1], ticket);
        assert_eq!(keys[2], proxy_ticket.beneficiary);
        assert_eq!(keys[3], state.treasury);
        assert_eq!(keys[4], stake_account);
        assert!(ix.accounts.iter().all(|meta| !meta.is_signer));
    }
}
