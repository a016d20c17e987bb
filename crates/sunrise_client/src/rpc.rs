//! [`Ledger`] over a Solana JSON-RPC endpoint

use std::str::FromStr;

use async_trait::async_trait;
use solana_account_decoder::UiAccountEncoding;
use solana_client::{
    client_error::{ClientError as RpcClientError, ClientErrorKind},
    nonblocking::rpc_client::RpcClient,
    rpc_config::{RpcAccountInfoConfig, RpcProgramAccountsConfig},
    rpc_filter::{Memcmp, RpcFilterType},
    rpc_request::{RpcError, RpcResponseErrorData},
};
use solana_sdk::{
    account::Account,
    commitment_config::CommitmentConfig,
    instruction::InstructionError,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
    transaction::{Transaction, TransactionError},
};
use tracing::{debug, warn};

use crate::{
    config::ClientConfig,
    error::{ClientError, ClientResult, LedgerRejection},
    ledger::{AccountFilter, Ledger, PendingTransaction},
};

pub struct RpcLedger {
    client: RpcClient,
    payer: Keypair,
    commitment: CommitmentConfig,
}

impl RpcLedger {
    pub fn new(rpc_url: String, payer: Keypair, commitment: CommitmentConfig) -> Self {
        Self {
            client: RpcClient::new_with_commitment(rpc_url, commitment),
            payer,
            commitment,
        }
    }

    pub fn from_config(config: &ClientConfig, payer: Keypair) -> Self {
        Self::new(
            config.rpc_url.clone(),
            payer,
            CommitmentConfig {
                commitment: config.commitment,
            },
        )
    }

    fn account_config(&self) -> RpcAccountInfoConfig {
        RpcAccountInfoConfig {
            encoding: Some(UiAccountEncoding::Base64),
            commitment: Some(self.commitment),
            ..Default::default()
        }
    }
}

#[async_trait]
impl Ledger for RpcLedger {
    fn payer(&self) -> Pubkey {
        self.payer.pubkey()
    }

    async fn fetch_account(&self, address: &Pubkey) -> ClientResult<Option<Account>> {
        let response = self
            .client
            .get_account_with_commitment(address, self.commitment)
            .await
            .map_err(|e| ClientError::transport(e.to_string()))?;
        Ok(response.value)
    }

    async fn fetch_multiple_accounts(
        &self,
        addresses: &[Pubkey],
    ) -> ClientResult<Vec<Option<Account>>> {
        let response = self
            .client
            .get_multiple_accounts_with_config(addresses, self.account_config())
            .await
            .map_err(|e| ClientError::transport(e.to_string()))?;
        debug!(target: "sunrise::ledger", slot = response.context.slot, count = addresses.len(), "batched account read");
        Ok(response.value)
    }

    async fn fetch_program_accounts(
        &self,
        program_id: &Pubkey,
        filters: Vec<AccountFilter>,
    ) -> ClientResult<Vec<(Pubkey, Account)>> {
        let filters = filters
            .into_iter()
            .map(|filter| match filter {
                AccountFilter::Memcmp { offset, bytes } => {
                    RpcFilterType::Memcmp(Memcmp::new_base58_encoded(offset, &bytes))
                }
                AccountFilter::DataSize(size) => RpcFilterType::DataSize(size),
            })
            .collect();

        self.client
            .get_program_accounts_with_config(
                program_id,
                RpcProgramAccountsConfig {
                    filters: Some(filters),
                    account_config: self.account_config(),
                    ..Default::default()
                },
            )
            .await
            .map_err(|e| ClientError::transport(e.to_string()))
    }

    async fn current_epoch(&self) -> ClientResult<u64> {
        let info = self
            .client
            .get_epoch_info()
            .await
            .map_err(|e| ClientError::transport(e.to_string()))?;
        Ok(info.epoch)
    }

    async fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> ClientResult<u64> {
        self.client
            .get_minimum_balance_for_rent_exemption(data_len)
            .await
            .map_err(|e| ClientError::transport(e.to_string()))
    }

    async fn submit(&self, transaction: PendingTransaction) -> ClientResult<Signature> {
        let blockhash = self
            .client
            .get_latest_blockhash()
            .await
            .map_err(|e| ClientError::transport(e.to_string()))?;

        let mut signers: Vec<&Keypair> = vec![&self.payer];
        signers.extend(transaction.signers.iter());

        let tx = Transaction::new_signed_with_payer(
            &transaction.instructions,
            Some(&self.payer.pubkey()),
            &signers,
            blockhash,
        );

        match self.client.send_and_confirm_transaction(&tx).await {
            Ok(signature) => {
                debug!(target: "sunrise::ledger", %signature, "transaction confirmed");
                Ok(signature)
            }
            Err(err) => {
                let mapped = map_submit_error(&transaction, err);
                warn!(target: "sunrise::ledger", error = %mapped, "transaction failed");
                Err(mapped)
            }
        }
    }
}

fn map_submit_error(transaction: &PendingTransaction, err: RpcClientError) -> ClientError {
    let Some(TransactionError::InstructionError(index, InstructionError::Custom(code))) =
        err.get_transaction_error()
    else {
        return ClientError::transport(err.to_string());
    };

    let origin = preflight_logs(&err)
        .and_then(|logs| failing_program(&logs))
        .or_else(|| transaction.program_at(index));

    match origin {
        Some(program_id) => LedgerRejection::new(program_id, code, index).into(),
        None => ClientError::transport(err.to_string()),
    }
}

fn preflight_logs(err: &RpcClientError) -> Option<Vec<String>> {
    match err.kind() {
        ClientErrorKind::RpcError(RpcError::RpcResponseError {
            data: RpcResponseErrorData::SendTransactionPreflightFailure(result),
            ..
        }) => result.logs.clone(),
        _ => None,
    }
}

/// The innermost program that failed. Runtime logs report it before any of its callers.
pub fn failing_program(logs: &[String]) -> Option<Pubkey> {
    logs.iter().find_map(|line| {
        let rest = line.strip_prefix("Program ")?;
        let (program, outcome) = rest.split_once(' ')?;
        if !outcome.starts_with("failed") {
            return None;
        }
        Pubkey::from_str(program).ok()
    })
}
