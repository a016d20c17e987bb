//! The chain as seen by the client: account reads and atomic transaction submission
//!
//! Everything above this module talks to the chain only through [`Ledger`], so the
//! router, adapters and ticket helpers can run against an in-memory double in tests.

use std::sync::Arc;

use anchor_lang::AccountDeserialize;
use async_trait::async_trait;
use solana_sdk::{
    account::Account, instruction::Instruction, pubkey::Pubkey, signature::Keypair,
    signature::Signature,
};

use crate::error::{ClientError, ClientResult, PreconditionError};

/// Server-side filter for program account scans
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountFilter {
    Memcmp { offset: usize, bytes: Vec<u8> },
    DataSize(u64),
}

/// Instructions submitted as one all-or-nothing transaction.
/// The ledger's payer always signs; `signers` holds any additional keypairs.
#[derive(Debug, Default)]
pub struct PendingTransaction {
    pub instructions: Vec<Instruction>,
    pub signers: Vec<Keypair>,
}

impl PendingTransaction {
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self {
            instructions,
            signers: Vec::new(),
        }
    }

    pub fn with_signer(mut self, signer: Keypair) -> Self {
        self.signers.push(signer);
        self
    }

    /// Program invoked by the instruction at `index`, if any
    pub fn program_at(&self, index: u8) -> Option<Pubkey> {
        self.instructions
            .get(usize::from(index))
            .map(|ix| ix.program_id)
    }
}

#[async_trait]
pub trait Ledger: Send + Sync {
    /// Fee payer and default signer for everything this ledger submits
    fn payer(&self) -> Pubkey;

    async fn fetch_account(&self, address: &Pubkey) -> ClientResult<Option<Account>>;

    /// Reads every address at one ledger moment, in request order
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

    /// Submits and confirms. Coded program failures come back as [`ClientError::Ledger`].
    async fn submit(&self, transaction: PendingTransaction) -> ClientResult<Signature>;
}

pub type SharedLedger = Arc<dyn Ledger>;

/// Fetches an account that must exist
pub async fn fetch_required(ledger: &dyn Ledger, address: &Pubkey) -> ClientResult<Account> {
    ledger
        .fetch_account(address)
        .await?
        .ok_or_else(|| PreconditionError::AccountNotFound(*address).into())
}

/// Fetches and decodes an Anchor-serialized account
pub async fn fetch_anchor<T: AccountDeserialize>(
    ledger: &dyn Ledger,
    address: &Pubkey,
) -> ClientResult<T> {
    let account = fetch_required(ledger, address).await?;
    decode_anchor(address, &account.data)
}

pub fn decode_anchor<T: AccountDeserialize>(address: &Pubkey, data: &[u8]) -> ClientResult<T> {
    let mut data = data;
    T::try_deserialize(&mut data).map_err(|e| ClientError::decode(*address, e))
}
