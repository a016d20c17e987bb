//! Client for the core registry: reads, admin transactions and the mint/burn account sets

use std::sync::{Arc, Mutex};

use anchor_lang::{InstructionData, ToAccountMetas};
use anchor_spl::{associated_token::get_associated_token_address_with_program_id, token_interface::Mint};
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
    system_program, sysvar,
};
use sunrise_core::{
    accounts as core_accounts, instruction as core_ix,
    state::{
        AllocationUpdate, BeamDetails, CoreState, EpochReport, RegisterStateInput,
        UpdateStateInput, EPOCH_REPORT_SEED, GSOL_MINT_AUTHORITY_SEED,
    },
};
use tracing::{debug, info};

use crate::{
    error::{ClientError, ClientResult, PreconditionError},
    ledger::{decode_anchor, PendingTransaction, SharedLedger},
    snapshot::{Generations, Snapshot},
};

pub fn gsol_mint_authority(state: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[state.as_ref(), GSOL_MINT_AUTHORITY_SEED],
        &sunrise_core::ID,
    )
}

pub fn epoch_report(state: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[state.as_ref(), EPOCH_REPORT_SEED], &sunrise_core::ID)
}

pub(crate) fn build_instruction(
    program_id: Pubkey,
    accounts: impl ToAccountMetas,
    data: impl InstructionData,
) -> Instruction {
    Instruction {
        program_id,
        accounts: accounts.to_account_metas(None),
        data: data.data(),
    }
}

/// Core state together with the mint figures the routing math depends on
#[derive(Debug, Clone)]
pub struct CoreView {
    pub address: Pubkey,
    pub state: CoreState,
    pub epoch_report: EpochReport,
    pub gsol_supply: u64,
    pub token_program: Pubkey,
}

impl CoreView {
    pub fn effective_supply(&self) -> u64 {
        self.state.effective_supply(self.gsol_supply)
    }

    /// Registered beams in slot order, skipping free slots
    pub fn beams(&self) -> impl Iterator<Item = &BeamDetails> {
        self.state.allocations.iter().filter(|b| !b.is_empty())
    }

    pub fn beam(&self, key: &Pubkey) -> Option<&BeamDetails> {
        self.state.get_beam_details(key)
    }

    pub fn gsol_mint_authority(&self) -> Pubkey {
        gsol_mint_authority(&self.address).0
    }

    pub fn epoch_report_address(&self) -> Pubkey {
        epoch_report(&self.address).0
    }

    pub fn gsol_token_account(&self, owner: &Pubkey) -> Pubkey {
        get_associated_token_address_with_program_id(
            owner,
            &self.state.gsol_mint,
            &self.token_program,
        )
    }

    pub fn mint_gsol_accounts(&self, beam: Pubkey, owner: &Pubkey) -> core_accounts::MintGsol {
        core_accounts::MintGsol {
            state: self.address,
            beam,
            gsol_mint: self.state.gsol_mint,
            gsol_mint_authority: self.gsol_mint_authority(),
            mint_gsol_to: self.gsol_token_account(owner),
            instructions_sysvar: sysvar::instructions::ID,
            token_program: self.token_program,
        }
    }

    pub fn burn_gsol_accounts(&self, beam: Pubkey, owner: &Pubkey) -> core_accounts::BurnGsol {
        core_accounts::BurnGsol {
            state: self.address,
            beam,
            gsol_mint: self.state.gsol_mint,
            burn_gsol_from_owner: *owner,
            burn_gsol_from: self.gsol_token_account(owner),
            instructions_sysvar: sysvar::instructions::ID,
            token_program: self.token_program,
        }
    }

    /// Account list of the core's mint CPI, in the order the program expects
    pub fn mint_accounts(&self, beam: Pubkey, owner: &Pubkey) -> Vec<AccountMeta> {
        self.mint_gsol_accounts(beam, owner).to_account_metas(None)
    }

    /// Account list of the core's burn CPI, in the order the program expects
    pub fn burn_accounts(&self, beam: Pubkey, owner: &Pubkey) -> Vec<AccountMeta> {
        self.burn_gsol_accounts(beam, owner).to_account_metas(None)
    }
}

// Batched reads retried when the state points at a different mint than the batch held
const VIEW_READ_ATTEMPTS: usize = 3;

pub struct CoreClient {
    ledger: SharedLedger,
    address: Pubkey,
    generations: Arc<Generations>,
    known_gsol_mint: Mutex<Option<Pubkey>>, // mint seen in the last view
}

impl CoreClient {
    pub fn new(ledger: SharedLedger, address: Pubkey) -> Self {
        Self {
            ledger,
            address,
            generations: Arc::new(Generations::default()),
            known_gsol_mint: Mutex::new(None),
        }
    }

    pub fn address(&self) -> Pubkey {
        self.address
    }

    pub fn ledger(&self) -> &SharedLedger {
        &self.ledger
    }

    /// Generation of the most recent refresh
    pub fn generation(&self) -> u64 {
        self.generations.current()
    }

    /// Creates a new core state. `state` becomes the state account address.
    pub async fn register(
        ledger: SharedLedger,
        state: Keypair,
        input: RegisterStateInput,
        gsol_mint: Pubkey,
    ) -> ClientResult<(Self, Signature)> {
        let address = state.pubkey();
        let ix = build_instruction(
            sunrise_core::ID,
            core_accounts::RegisterState {
                payer: ledger.payer(),
                state: address,
                epoch_report: epoch_report(&address).0,
                gsol_mint,
                gsol_mint_authority: gsol_mint_authority(&address).0,
                system_program: system_program::ID,
            },
            core_ix::RegisterState { input },
        );

        let signature = ledger
            .submit(PendingTransaction::new(vec![ix]).with_signer(state))
            .await?;
        info!(target: "sunrise::core", state = %address, %gsol_mint, %signature, "registered state");

        Ok((Self::new(ledger, address), signature))
    }

    /// Reads the state, its epoch report and the gSOL mint as a new generation
    pub async fn refresh(&self) -> ClientResult<Snapshot<CoreView>> {
        let generation = self.generations.advance();
        let view = self.view().await?;
        Ok(Snapshot::new(generation, view))
    }

    /// Reads the current view without starting a new generation.
    ///
    /// The state, its epoch report and the gSOL mint come from a single batched read,
    /// so the supply always belongs to the same ledger moment as the state.
    pub async fn view(&self) -> ClientResult<CoreView> {
        let report_address = epoch_report(&self.address).0;

        for _ in 0..VIEW_READ_ATTEMPTS {
            let known_mint = self.known_gsol_mint.lock().ok().and_then(|mint| *mint);
            let mut addresses = vec![self.address, report_address];
            addresses.extend(known_mint);

            let mut accounts = self.ledger.fetch_multiple_accounts(&addresses).await?;
            accounts.resize(addresses.len(), None);
            let mut accounts = addresses.iter().zip(accounts).map(|(address, account)| {
                account.ok_or(PreconditionError::AccountNotFound(*address))
            });

            let state: CoreState = match accounts.next() {
                Some(account) => decode_anchor(&self.address, &account?.data)?,
                None => return Err(PreconditionError::AccountNotFound(self.address).into()),
            };
            let epoch_report: EpochReport = match accounts.next() {
                Some(account) => decode_anchor(&report_address, &account?.data)?,
                None => return Err(PreconditionError::AccountNotFound(report_address).into()),
            };

            if known_mint != Some(state.gsol_mint) {
                debug!(target: "sunrise::core", state = %self.address, gsol_mint = %state.gsol_mint, "gSOL mint not in batch, reading again");
                if let Ok(mut mint) = self.known_gsol_mint.lock() {
                    *mint = Some(state.gsol_mint);
                }
                continue;
            }

            let mint_account = match accounts.next() {
                Some(account) => account?,
                None => return Err(PreconditionError::AccountNotFound(state.gsol_mint).into()),
            };
            let mint: Mint = decode_anchor(&state.gsol_mint, &mint_account.data)?;

            return Ok(CoreView {
                address: self.address,
                state,
                epoch_report,
                gsol_supply: mint.supply,
                token_program: mint_account.owner,
            });
        }

        Err(ClientError::transport(format!(
            "gSOL mint of {} kept changing while reading",
            self.address
        )))
    }

    async fn submit_admin(&self, ix: Instruction, action: &'static str) -> ClientResult<Signature> {
        let signature = self.ledger.submit(PendingTransaction::new(vec![ix])).await?;
        info!(target: "sunrise::core", state = %self.address, %signature, action, "admin transaction confirmed");
        Ok(signature)
    }

    pub async fn register_beam(&self, beam: Pubkey) -> ClientResult<Signature> {
        let ix = build_instruction(
            sunrise_core::ID,
            core_accounts::RegisterBeam {
                update_authority: self.ledger.payer(),
                state: self.address,
                beam_account: beam,
            },
            core_ix::RegisterBeam {},
        );
        self.submit_admin(ix, "register_beam").await
    }

    pub async fn remove_beam(&self, beam: Pubkey) -> ClientResult<Signature> {
        let ix = build_instruction(
            sunrise_core::ID,
            core_accounts::RemoveBeam {
                update_authority: self.ledger.payer(),
                state: self.address,
                epoch_report: epoch_report(&self.address).0,
            },
            core_ix::RemoveBeam { beam },
        );
        self.submit_admin(ix, "remove_beam").await
    }

    pub async fn update_allocations(
        &self,
        new_allocations: Vec<AllocationUpdate>,
    ) -> ClientResult<Signature> {
        let ix = build_instruction(
            sunrise_core::ID,
            core_accounts::UpdateAllocations {
                update_authority: self.ledger.payer(),
                state: self.address,
            },
            core_ix::UpdateAllocations { new_allocations },
        );
        self.submit_admin(ix, "update_allocations").await
    }

    pub async fn update_state(&self, input: UpdateStateInput) -> ClientResult<Signature> {
        let ix = build_instruction(
            sunrise_core::ID,
            core_accounts::UpdateState {
                update_authority: self.ledger.payer(),
                state: self.address,
            },
            core_ix::UpdateState { input },
        );
        self.submit_admin(ix, "update_state").await
    }

    pub async fn resize_allocations(&self, additional_beams: u8) -> ClientResult<Signature> {
        let payer = self.ledger.payer();
        let ix = build_instruction(
            sunrise_core::ID,
            core_accounts::ResizeAllocations {
                update_authority: payer,
                payer,
                state: self.address,
                epoch_report: epoch_report(&self.address).0,
                system_program: system_program::ID,
            },
            core_ix::ResizeAllocations { additional_beams },
        );
        self.submit_admin(ix, "resize_allocations").await
    }

    pub async fn set_draining_mode(&self, beam: Pubkey, draining_mode: bool) -> ClientResult<Signature> {
        let ix = build_instruction(
            sunrise_core::ID,
            core_accounts::SetDrainingMode {
                update_authority: self.ledger.payer(),
                state: self.address,
            },
            core_ix::SetDrainingMode { beam, draining_mode },
        );
        self.submit_admin(ix, "set_draining_mode").await
    }

    pub async fn export_mint_authority(&self, new_authority: Pubkey) -> ClientResult<Signature> {
        let view = self.view().await?;
        let ix = build_instruction(
            sunrise_core::ID,
            core_accounts::ExportMintAuthority {
                update_authority: self.ledger.payer(),
                state: self.address,
                gsol_mint: view.state.gsol_mint,
                gsol_mint_authority: view.gsol_mint_authority(),
                new_authority,
                token_program: view.token_program,
            },
            core_ix::ExportMintAuthority {},
        );
        self.submit_admin(ix, "export_mint_authority").await
    }
}
