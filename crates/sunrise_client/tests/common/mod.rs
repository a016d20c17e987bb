#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use anchor_lang::{AccountSerialize, Discriminator};
use anchor_spl::token::spl_token;
use async_trait::async_trait;
use solana_sdk::{
    account::Account, instruction::Instruction, program_option::COption, program_pack::Pack,
    pubkey::Pubkey, signature::Signature, signer::Signer,
};
use sunrise_client::{
    core::epoch_report,
    error::{ClientError, ClientResult},
    ledger::{AccountFilter, Ledger, PendingTransaction},
};
use sunrise_core::state::{BeamDetails, CoreState, EpochReport};

/// Ledger double holding accounts in memory and recording every submission
pub struct InMemoryLedger {
    payer: Pubkey,
    accounts: Mutex<HashMap<Pubkey, Account>>,
    epoch: Mutex<u64>,
    submitted: Mutex<Vec<Vec<Instruction>>>,
    signers: Mutex<Vec<Vec<Pubkey>>>,
    rejections: Mutex<VecDeque<ClientError>>,
    batched_reads: Mutex<Vec<Vec<Pubkey>>>,
}

impl InMemoryLedger {
    pub fn new(payer: Pubkey) -> Arc<Self> {
        Arc::new(Self {
            payer,
            accounts: Mutex::new(HashMap::new()),
            epoch: Mutex::new(0),
            submitted: Mutex::new(Vec::new()),
            signers: Mutex::new(Vec::new()),
            rejections: Mutex::new(VecDeque::new()),
            batched_reads: Mutex::new(Vec::new()),
        })
    }

    pub fn set_account(&self, address: Pubkey, owner: Pubkey, data: Vec<u8>) {
        self.accounts.lock().unwrap().insert(
            address,
            Account {
                lamports: 1_000_000,
                data,
                owner,
                executable: false,
                rent_epoch: 0,
            },
        );
    }

    pub fn set_anchor_account<T: AccountSerialize>(&self, address: Pubkey, owner: Pubkey, value: &T) {
        let mut data = Vec::new();
        value.try_serialize(&mut data).unwrap();
        self.set_account(address, owner, data);
    }

    pub fn set_epoch(&self, epoch: u64) {
        *self.epoch.lock().unwrap() = epoch;
    }

    /// The next submission fails with `error`
    pub fn reject_next(&self, error: ClientError) {
        self.rejections.lock().unwrap().push_back(error);
    }

    pub fn submitted(&self) -> Vec<Vec<Instruction>> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn signers(&self) -> Vec<Vec<Pubkey>> {
        self.signers.lock().unwrap().clone()
    }

    /// Address lists of every multi-account read, in call order
    pub fn batched_reads(&self) -> Vec<Vec<Pubkey>> {
        self.batched_reads.lock().unwrap().clone()
    }
}

fn matches_filter(account: &Account, filter: &AccountFilter) -> bool {
    match filter {
        AccountFilter::DataSize(size) => account.data.len() as u64 == *size,
        AccountFilter::Memcmp { offset, bytes } => account
            .data
            .get(*offset..offset + bytes.len())
            .map_or(false, |slice| slice == bytes.as_slice()),
    }
}

#[async_trait]
impl Ledger for InMemoryLedger {
    fn payer(&self) -> Pubkey {
        self.payer
    }

    async fn fetch_account(&self, address: &Pubkey) -> ClientResult<Option<Account>> {
        Ok(self.accounts.lock().unwrap().get(address).cloned())
    }

    async fn fetch_multiple_accounts(
        &self,
        addresses: &[Pubkey],
    ) -> ClientResult<Vec<Option<Account>>> {
        self.batched_reads.lock().unwrap().push(addresses.to_vec());
        let accounts = self.accounts.lock().unwrap();
        Ok(addresses.iter().map(|address| accounts.get(address).cloned()).collect())
    }

    async fn fetch_program_accounts(
        &self,
        program_id: &Pubkey,
        filters: Vec<AccountFilter>,
    ) -> ClientResult<Vec<(Pubkey, Account)>> {
        let mut found: Vec<(Pubkey, Account)> = self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, account)| account.owner == *program_id)
            .filter(|(_, account)| filters.iter().all(|f| matches_filter(account, f)))
            .map(|(address, account)| (*address, account.clone()))
            .collect();
        found.sort_by_key(|(address, _)| *address);
        Ok(found)
    }

    async fn current_epoch(&self) -> ClientResult<u64> {
        Ok(*self.epoch.lock().unwrap())
    }

    async fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> ClientResult<u64> {
        Ok((data_len as u64 + 128) * 6_960)
    }

    async fn submit(&self, transaction: PendingTransaction) -> ClientResult<Signature> {
        if let Some(error) = self.rejections.lock().unwrap().pop_front() {
            return Err(error);
        }
        self.signers
            .lock()
            .unwrap()
            .push(transaction.signers.iter().map(|k| k.pubkey()).collect());
        self.submitted
            .lock()
            .unwrap()
            .push(transaction.instructions);
        Ok(Signature::new_unique())
    }
}

pub struct CoreFixture {
    pub state: Pubkey,
    pub gsol_mint: Pubkey,
    pub update_authority: Pubkey,
}

pub fn mint_data(supply: u64, authority: Pubkey) -> Vec<u8> {
    let mint = spl_token::state::Mint {
        mint_authority: COption::Some(authority),
        supply,
        decimals: 9,
        is_initialized: true,
        freeze_authority: COption::None,
    };
    let mut data = vec![0u8; spl_token::state::Mint::LEN];
    spl_token::state::Mint::pack(mint, &mut data).unwrap();
    data
}

/// Writes a core state with `beams` in slot order, its epoch report and a gSOL mint
pub fn install_core(
    ledger: &InMemoryLedger,
    beams: &[BeamDetails],
    pre_supply: u64,
    gsol_supply: u64,
) -> CoreFixture {
    let state_address = Pubkey::new_unique();
    let gsol_mint = Pubkey::new_unique();
    let update_authority = ledger.payer();

    let state = CoreState {
        update_authority,
        gsol_mint,
        pre_supply,
        gsol_mint_authority_bump: 255,
        epoch_report_bump: 255,
        yield_account: Pubkey::new_unique(),
        reserved: [0; 16],
        allocations: beams.to_vec(),
    };
    ledger.set_anchor_account(state_address, sunrise_core::ID, &state);

    let report = EpochReport {
        state: state_address,
        current_gsol_supply: 0,
        beam_epoch_details: vec![Default::default(); beams.len()],
    };
    ledger.set_anchor_account(epoch_report(&state_address).0, sunrise_core::ID, &report);

    ledger.set_account(gsol_mint, spl_token::ID, mint_data(gsol_supply, Pubkey::new_unique()));

    CoreFixture {
        state: state_address,
        gsol_mint,
        update_authority,
    }
}

pub fn beam(key: Pubkey, allocation: u8, partial_gsol_supply: u64) -> BeamDetails {
    BeamDetails {
        key,
        allocation,
        partial_gsol_supply,
        draining_mode: false,
    }
}

pub fn anchor_discriminator<T: Discriminator>() -> Vec<u8> {
    T::DISCRIMINATOR.to_vec()
}
