//! Beam adapters: one client per kind of underlying pool, behind a common contract

pub mod liquidity_pool;
pub mod stake_pool;

pub use liquidity_pool::{LiquidityPoolAccounts, LiquidityPoolBeam};
pub use stake_pool::StakePoolBeam;

use async_trait::async_trait;
use solana_sdk::{pubkey::Pubkey, signature::Signature};

use crate::{
    error::{ClientResult, PreconditionError},
    snapshot::Snapshot,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BeamCapability {
    SolDeposit,
    StakeDeposit,
    LiquidUnstake,
    OrderUnstake,
    StakeWithdrawal,
}

impl BeamCapability {
    fn bit(self) -> u8 {
        match self {
            BeamCapability::SolDeposit => 1 << 0,
            BeamCapability::StakeDeposit => 1 << 1,
            BeamCapability::LiquidUnstake => 1 << 2,
            BeamCapability::OrderUnstake => 1 << 3,
            BeamCapability::StakeWithdrawal => 1 << 4,
        }
    }

    /// Capabilities that add gSOL supply and are therefore bound by the mint window
    pub fn is_deposit(self) -> bool {
        matches!(self, BeamCapability::SolDeposit | BeamCapability::StakeDeposit)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CapabilitySet(u8);

impl CapabilitySet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn of(capabilities: &[BeamCapability]) -> Self {
        capabilities
            .iter()
            .fold(Self::empty(), |set, capability| set.with(*capability))
    }

    pub fn with(self, capability: BeamCapability) -> Self {
        Self(self.0 | capability.bit())
    }

    pub fn supports(&self, capability: BeamCapability) -> bool {
        self.0 & capability.bit() != 0
    }

    pub fn require(&self, beam: Pubkey, capability: BeamCapability) -> Result<(), PreconditionError> {
        if !self.supports(capability) {
            return Err(PreconditionError::CapabilityNotSupported { beam, capability });
        }
        Ok(())
    }
}

/// What a refresh learns about a beam
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeamView {
    pub key: Pubkey,
    pub capabilities: CapabilitySet,
    pub proxy_state: Pubkey,
    pub treasury: Pubkey,
    /// Lamports the beam's pool position is worth, when the client can price it
    pub position_value: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BeamUpdate {
    pub update_authority: Option<Pubkey>,
    pub treasury: Option<Pubkey>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WithdrawnStake {
    pub signature: Signature,
    pub stake_account: Pubkey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderedWithdrawal {
    pub signature: Signature,
    /// Wrapper ticket owned by the beam program
    pub ticket: Pubkey,
    /// Delayed-unstake position the ticket settles from
    pub underlying_ticket: Pubkey,
}

/// Uniform contract over beams. Implementations check their [`CapabilitySet`] before
/// touching the ledger and fail with `CapabilityNotSupported` otherwise.
#[async_trait]
pub trait BeamAdapter: Send + Sync {
    /// Key the beam signs core CPIs with, as registered in the core state
    fn key(&self) -> Pubkey;

    fn program_id(&self) -> Pubkey;

    fn capabilities(&self) -> CapabilitySet;

    fn supports(&self, capability: BeamCapability) -> bool {
        self.capabilities().supports(capability)
    }

    async fn refresh(&self, generation: u64) -> ClientResult<Snapshot<BeamView>>;

    async fn update(&self, params: BeamUpdate) -> ClientResult<Signature>;

    /// Mints gSOL to `recipient`, or to the ledger payer when absent
    async fn deposit(&self, lamports: u64, recipient: Option<Pubkey>) -> ClientResult<Signature>;

    async fn deposit_stake(
        &self,
        stake_account: Pubkey,
        recipient: Option<Pubkey>,
    ) -> ClientResult<Signature>;

    async fn withdraw(&self, lamports: u64) -> ClientResult<Signature>;

    async fn withdraw_stake(&self, lamports: u64) -> ClientResult<WithdrawnStake>;

    async fn order_withdraw(&self, lamports: u64) -> ClientResult<OrderedWithdrawal>;

    /// Permissionless, any payer may redeem any unlocked ticket
    async fn redeem_ticket(&self, ticket: Pubkey) -> ClientResult<Signature>;

    async fn update_epoch_report(&self) -> ClientResult<Signature>;

    async fn extract_yield(&self) -> ClientResult<Signature>;
}

pub(crate) fn require_positive(lamports: u64) -> Result<(), PreconditionError> {
    if lamports == 0 {
        return Err(PreconditionError::ZeroAmount);
    }
    Ok(())
}
