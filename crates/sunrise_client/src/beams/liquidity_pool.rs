//! Client for a liquidity pool beam
//!
//! The beam program lives outside this workspace, so its instructions are assembled
//! from its published account layout rather than from generated bindings.

use std::sync::Arc;

use anchor_lang::{prelude::borsh, solana_program::hash::hash, AnchorDeserialize, AnchorSerialize};
use spl_associated_token_account::instruction::create_associated_token_account_idempotent;
use async_trait::async_trait;
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    signature::Signature,
    system_program,
};
use tracing::info;

use super::{
    require_positive, BeamAdapter, BeamCapability, BeamUpdate, BeamView, CapabilitySet,
    OrderedWithdrawal, WithdrawnStake,
};
use crate::{
    core::{CoreClient, CoreView},
    error::{ClientError, ClientResult, PreconditionError},
    ledger::{fetch_required, PendingTransaction, SharedLedger},
    snapshot::Snapshot,
};

const STATE_SEED: &[u8] = b"sunrise-marinade-lp";
const VAULT_AUTHORITY_SEED: &[u8] = b"vault-authority";
const ANCHOR_DISCRIMINATOR_SIZE: usize = 8;

/// Addresses of the beam and of the liquidity pool it proxies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiquidityPoolAccounts {
    pub program_id: Pubkey,
    pub state: Pubkey,
    pub pool_state: Pubkey,
    pub pool_program: Pubkey,
    pub lp_mint: Pubkey,
    pub lp_mint_authority: Pubkey,
    pub lp_token_vault: Pubkey,
    pub sol_leg: Pubkey,
    pub token_leg: Pubkey,
    pub token_leg_authority: Pubkey,
}

impl LiquidityPoolAccounts {
    /// Beam state PDA for a core state
    pub fn state_address(program_id: &Pubkey, sunrise_state: &Pubkey) -> (Pubkey, u8) {
        Pubkey::find_program_address(&[STATE_SEED, sunrise_state.as_ref()], program_id)
    }

    pub fn vault_authority(&self) -> Pubkey {
        Pubkey::find_program_address(&[self.state.as_ref(), VAULT_AUTHORITY_SEED], &self.program_id).0
    }
}

/// Beam state as stored by the liquidity pool beam program, after its discriminator.
/// Field order is the on-chain layout.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct LiquidityPoolState {
    pub update_authority: Pubkey,
    pub pool_state: Pubkey,
    pub sunrise_state: Pubkey,
    pub gsol_mint: Pubkey,
    pub vault_authority_bump: u8,
    pub token_account: Pubkey, // receives the pool's non-SOL leg on withdrawal
    pub treasury: Pubkey,
}

impl LiquidityPoolState {
    pub fn decode(address: &Pubkey, data: &[u8]) -> ClientResult<Self> {
        let mut body = data
            .get(ANCHOR_DISCRIMINATOR_SIZE..)
            .ok_or_else(|| ClientError::decode(*address, "account too small"))?;
        Self::deserialize(&mut body).map_err(|e| ClientError::decode(*address, e))
    }
}

fn sighash(name: &str) -> [u8; 8] {
    let mut discriminator = [0u8; 8];
    discriminator.copy_from_slice(&hash(format!("global:{name}").as_bytes()).to_bytes()[..8]);
    discriminator
}

fn instruction_data(name: &str, args: &impl AnchorSerialize) -> ClientResult<Vec<u8>> {
    let mut data = sighash(name).to_vec();
    args.serialize(&mut data)
        .map_err(|e| ClientError::transport(format!("failed to encode {name}: {e}")))?;
    Ok(data)
}

pub fn deposit_instruction(
    accounts: &LiquidityPoolAccounts,
    core: &CoreView,
    depositor: Pubkey,
    recipient: Pubkey,
    lamports: u64,
) -> ClientResult<Instruction> {
    let mint = core.mint_gsol_accounts(accounts.state, &recipient);

    Ok(Instruction {
        program_id: accounts.program_id,
        accounts: vec![
            AccountMeta::new(accounts.state, false),
            AccountMeta::new(accounts.pool_state, false),
            AccountMeta::new(mint.state, false),
            AccountMeta::new(depositor, true),
            AccountMeta::new(mint.mint_gsol_to, false),
            AccountMeta::new(accounts.lp_mint, false),
            AccountMeta::new(accounts.lp_token_vault, false),
            AccountMeta::new_readonly(accounts.vault_authority(), false),
            AccountMeta::new(mint.gsol_mint, false),
            AccountMeta::new_readonly(mint.gsol_mint_authority, false),
            AccountMeta::new_readonly(mint.instructions_sysvar, false),
            AccountMeta::new(accounts.sol_leg, false),
            AccountMeta::new(accounts.token_leg, false),
            AccountMeta::new_readonly(accounts.token_leg_authority, false),
            AccountMeta::new_readonly(accounts.lp_mint_authority, false),
            AccountMeta::new_readonly(system_program::ID, false),
            AccountMeta::new_readonly(mint.token_program, false),
            AccountMeta::new_readonly(sunrise_core::ID, false),
            AccountMeta::new_readonly(accounts.pool_program, false),
        ],
        data: instruction_data("deposit", &lamports)?,
    })
}

pub fn withdraw_instruction(
    accounts: &LiquidityPoolAccounts,
    state: &LiquidityPoolState,
    core: &CoreView,
    withdrawer: Pubkey,
    lamports: u64,
) -> ClientResult<Instruction> {
    let burn = core.burn_gsol_accounts(accounts.state, &withdrawer);

    Ok(Instruction {
        program_id: accounts.program_id,
        accounts: vec![
            AccountMeta::new(accounts.state, false),
            AccountMeta::new(accounts.pool_state, false),
            AccountMeta::new(burn.state, false),
            AccountMeta::new(withdrawer, true),
            AccountMeta::new(burn.burn_gsol_from, false),
            AccountMeta::new(accounts.lp_mint, false),
            AccountMeta::new(accounts.lp_token_vault, false),
            AccountMeta::new_readonly(accounts.vault_authority(), false),
            AccountMeta::new(state.token_account, false),
            AccountMeta::new(accounts.sol_leg, false),
            AccountMeta::new(accounts.token_leg, false),
            AccountMeta::new(accounts.token_leg_authority, false),
            AccountMeta::new_readonly(system_program::ID, false),
            AccountMeta::new_readonly(burn.token_program, false),
            AccountMeta::new(burn.gsol_mint, false),
            AccountMeta::new_readonly(core.gsol_mint_authority(), false),
            AccountMeta::new_readonly(burn.instructions_sysvar, false),
            AccountMeta::new_readonly(sunrise_core::ID, false),
            AccountMeta::new_readonly(accounts.pool_program, false),
        ],
        data: instruction_data("withdraw", &lamports)?,
    })
}

pub struct LiquidityPoolBeam {
    ledger: SharedLedger,
    core: Arc<CoreClient>,
    accounts: LiquidityPoolAccounts,
}

impl LiquidityPoolBeam {
    const CAPABILITIES: [BeamCapability; 2] =
        [BeamCapability::SolDeposit, BeamCapability::LiquidUnstake];

    pub fn new(core: Arc<CoreClient>, accounts: LiquidityPoolAccounts) -> Self {
        Self {
            ledger: core.ledger().clone(),
            core,
            accounts,
        }
    }

    pub fn accounts(&self) -> &LiquidityPoolAccounts {
        &self.accounts
    }

    async fn state(&self) -> ClientResult<LiquidityPoolState> {
        let account = fetch_required(self.ledger.as_ref(), &self.accounts.state).await?;
        if account.owner != self.accounts.program_id {
            return Err(ClientError::decode(
                self.accounts.state,
                format!("owned by {}, expected {}", account.owner, self.accounts.program_id),
            ));
        }
        LiquidityPoolState::decode(&self.accounts.state, &account.data)
    }

    fn unsupported(&self, operation: &'static str) -> ClientError {
        PreconditionError::OperationNotSupported {
            beam: self.accounts.state,
            operation,
        }
        .into()
    }

    async fn submit(&self, tx: PendingTransaction, action: &'static str, lamports: u64) -> ClientResult<Signature> {
        let signature = self.ledger.submit(tx).await?;
        info!(target: "sunrise::beam", beam = %self.accounts.state, action, lamports, %signature, "beam transaction confirmed");
        Ok(signature)
    }
}

#[async_trait]
impl BeamAdapter for LiquidityPoolBeam {
    fn key(&self) -> Pubkey {
        self.accounts.state
    }

    fn program_id(&self) -> Pubkey {
        self.accounts.program_id
    }

    fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::of(&Self::CAPABILITIES)
    }

    async fn refresh(&self, generation: u64) -> ClientResult<Snapshot<BeamView>> {
        let state = self.state().await?;

        Ok(Snapshot::new(
            generation,
            BeamView {
                key: self.accounts.state,
                capabilities: self.capabilities(),
                proxy_state: state.pool_state,
                treasury: state.treasury,
                position_value: None,
            },
        ))
    }

    async fn update(&self, params: BeamUpdate) -> ClientResult<Signature> {
        let mut state = self.state().await?;
        if let Some(update_authority) = params.update_authority {
            state.update_authority = update_authority;
        }
        if let Some(treasury) = params.treasury {
            state.treasury = treasury;
        }

        let ix = Instruction {
            program_id: self.accounts.program_id,
            accounts: vec![
                AccountMeta::new(self.ledger.payer(), true),
                AccountMeta::new(self.accounts.state, false),
            ],
            data: instruction_data("update", &state)?,
        };

        self.submit(PendingTransaction::new(vec![ix]), "update", 0)
            .await
    }

    async fn deposit(&self, lamports: u64, recipient: Option<Pubkey>) -> ClientResult<Signature> {
        self.capabilities()
            .require(self.accounts.state, BeamCapability::SolDeposit)?;
        require_positive(lamports)?;

        let core = self.core.view().await?;
        let depositor = self.ledger.payer();
        let recipient = recipient.unwrap_or(depositor);

        let create_gsol_account = create_associated_token_account_idempotent(
            &depositor,
            &recipient,
            &core.state.gsol_mint,
            &core.token_program,
        );
        let ix = deposit_instruction(&self.accounts, &core, depositor, recipient, lamports)?;

        self.submit(
            PendingTransaction::new(vec![create_gsol_account, ix]),
            "deposit",
            lamports,
        )
        .await
    }

    async fn deposit_stake(
        &self,
        _stake_account: Pubkey,
        _recipient: Option<Pubkey>,
    ) -> ClientResult<Signature> {
        self.capabilities()
            .require(self.accounts.state, BeamCapability::StakeDeposit)?;
        Err(self.unsupported("deposit_stake"))
    }

    async fn withdraw(&self, lamports: u64) -> ClientResult<Signature> {
        self.capabilities()
            .require(self.accounts.state, BeamCapability::LiquidUnstake)?;
        require_positive(lamports)?;

        let state = self.state().await?;
        let core = self.core.view().await?;
        let ix = withdraw_instruction(&self.accounts, &state, &core, self.ledger.payer(), lamports)?;

        self.submit(PendingTransaction::new(vec![ix]), "withdraw", lamports)
            .await
    }

    async fn withdraw_stake(&self, _lamports: u64) -> ClientResult<WithdrawnStake> {
        self.capabilities()
            .require(self.accounts.state, BeamCapability::StakeWithdrawal)?;
        Err(self.unsupported("withdraw_stake"))
    }

    async fn order_withdraw(&self, _lamports: u64) -> ClientResult<OrderedWithdrawal> {
        self.capabilities()
            .require(self.accounts.state, BeamCapability::OrderUnstake)?;
        Err(self.unsupported("order_withdraw"))
    }

    async fn redeem_ticket(&self, _ticket: Pubkey) -> ClientResult<Signature> {
        self.capabilities()
            .require(self.accounts.state, BeamCapability::OrderUnstake)?;
        Err(self.unsupported("redeem_ticket"))
    }

    async fn update_epoch_report(&self) -> ClientResult<Signature> {
        Err(self.unsupported("update_epoch_report"))
    }

    async fn extract_yield(&self) -> ClientResult<Signature> {
        Err(self.unsupported("extract_yield"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::sysvar;

    #[test]
    fn sighash_matches_anchor_namespace() {
        let expected = &hash(b"global:deposit").to_bytes()[..8];
        assert_eq!(&sighash("deposit")[..], expected);
        assert_ne!(sighash("deposit"), sighash("withdraw"));
    }

    fn accounts() -> LiquidityPoolAccounts {
        let program_id = Pubkey::new_unique();
        LiquidityPoolAccounts {
            program_id,
            state: LiquidityPoolAccounts::state_address(&program_id, &Pubkey::new_unique()).0,
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

    fn core_view() -> CoreView {
        CoreView {
            address: Pubkey::new_unique(),
            state: sunrise_core::state::CoreState {
                gsol_mint: Pubkey::new_unique(),
                ..Default::default()
            },
            epoch_report: Default::default(),
            gsol_supply: 0,
            token_program: anchor_spl::token::ID,
        }
    }

    #[test]
    fn decodes_the_program_layout() {
        let address = Pubkey::new_unique();
        let (update_authority, pool_state, sunrise_state, gsol_mint, token_account, treasury) = (
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
        );

        // discriminator, then fields in declaration order of the program's state
        let mut data = vec![7u8; ANCHOR_DISCRIMINATOR_SIZE];
        data.extend_from_slice(update_authority.as_ref());
        data.extend_from_slice(pool_state.as_ref());
        data.extend_from_slice(sunrise_state.as_ref());
        data.extend_from_slice(gsol_mint.as_ref());
        data.push(254);
        data.extend_from_slice(token_account.as_ref());
        data.extend_from_slice(treasury.as_ref());
        assert_eq!(data.len(), 8 + 32 * 6 + 1);

        let state = LiquidityPoolState::decode(&address, &data).unwrap();
        assert_eq!(state.update_authority, update_authority);
        assert_eq!(state.pool_state, pool_state);
        assert_eq!(state.sunrise_state, sunrise_state);
        assert_eq!(state.gsol_mint, gsol_mint);
        assert_eq!(state.vault_authority_bump, 254);
        assert_eq!(state.token_account, token_account);
        assert_eq!(state.treasury, treasury);

        assert!(LiquidityPoolState::decode(&address, &[0u8; 4]).is_err());
    }

    #[test]
    fn vault_authority_uses_the_program_seed() {
        let accounts = accounts();
        let expected = Pubkey::find_program_address(
            &[accounts.state.as_ref(), b"vault-authority"],
            &accounts.program_id,
        )
        .0;
        assert_eq!(accounts.vault_authority(), expected);
    }

    #[test]
    fn deposit_accounts_follow_program_order() {
        let accounts = accounts();
        let core = core_view();
        let depositor = Pubkey::new_unique();
        let ix = deposit_instruction(&accounts, &core, depositor, depositor, 10).unwrap();

        assert_eq!(ix.accounts.len(), 19);
        assert_eq!(ix.accounts[0].pubkey, accounts.state);
        assert!(ix.accounts[0].is_writable);
        assert_eq!(ix.accounts[3].pubkey, depositor);
        assert!(ix.accounts[3].is_signer);
        assert_eq!(ix.accounts[7].pubkey, accounts.vault_authority());
        assert_eq!(ix.accounts[8].pubkey, core.state.gsol_mint);
        assert_eq!(ix.accounts[9].pubkey, core.gsol_mint_authority());
        assert_eq!(ix.accounts[17].pubkey, sunrise_core::ID);
        assert_eq!(ix.accounts[18].pubkey, accounts.pool_program);
    }

    #[test]
    fn withdraw_accounts_follow_program_order() {
        let accounts = accounts();
        let core = core_view();
        let state = LiquidityPoolState {
            token_account: Pubkey::new_unique(),
            ..Default::default()
        };
        let withdrawer = Pubkey::new_unique();
        let ix = withdraw_instruction(&accounts, &state, &core, withdrawer, 10).unwrap();

        assert_eq!(ix.accounts.len(), 19);
        assert_eq!(ix.accounts[0].pubkey, accounts.state);
        assert!(ix.accounts[0].is_writable);
        assert_eq!(ix.accounts[3].pubkey, withdrawer);
        assert!(ix.accounts[3].is_signer);
        assert_eq!(ix.accounts[8].pubkey, state.token_account);
        assert_eq!(ix.accounts[14].pubkey, core.state.gsol_mint);
        assert_eq!(ix.accounts[15].pubkey, core.gsol_mint_authority());
        assert_eq!(ix.accounts[16].pubkey, sysvar::instructions::ID);
        assert_eq!(ix.accounts[17].pubkey, sunrise_core::ID);
        assert_eq!(ix.accounts[18].pubkey, accounts.pool_program);
    }
}
