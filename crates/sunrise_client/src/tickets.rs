//! Delayed withdrawal tickets: lookup, unlock polling and permissionless redemption

use std::collections::HashMap;
use std::time::Duration;

use anchor_lang::Discriminator;
use solana_sdk::{pubkey::Pubkey, signature::Signature};
use spl_beam::state::{BeamState, ProxyTicket};
use tracing::{debug, info, warn};

use crate::{
    beams::stake_pool::redeem_ticket_instruction,
    config::ClientConfig,
    error::{ClientError, ClientResult},
    ledger::{decode_anchor, fetch_anchor, AccountFilter, PendingTransaction, SharedLedger},
};

/// Discriminator, then the state, beam and stake account keys
pub const BENEFICIARY_OFFSET: usize = 8 + 32 * 3;

pub fn is_redeemable(ticket: &ProxyTicket, epoch: u64) -> bool {
    ticket.is_unlocked(epoch)
}

#[derive(Debug)]
pub struct Redemption {
    pub ticket: Pubkey,
    pub lamports: u64,
    pub outcome: Result<Signature, ClientError>,
}

pub struct TicketClient {
    ledger: SharedLedger,
    poll_interval: Duration,
}

impl TicketClient {
    pub fn new(ledger: SharedLedger, poll_interval: Duration) -> Self {
        Self {
            ledger,
            poll_interval,
        }
    }

    pub fn from_config(ledger: SharedLedger, config: &ClientConfig) -> Self {
        Self::new(ledger, config.ticket_poll_interval())
    }

    pub async fn fetch_tickets(&self, beneficiary: &Pubkey) -> ClientResult<Vec<(Pubkey, ProxyTicket)>> {
        let accounts = self
            .ledger
            .fetch_program_accounts(
                &spl_beam::ID,
                vec![
                    AccountFilter::DataSize(ProxyTicket::SIZE as u64),
                    AccountFilter::Memcmp {
                        offset: 0,
                        bytes: ProxyTicket::DISCRIMINATOR.to_vec(),
                    },
                    AccountFilter::Memcmp {
                        offset: BENEFICIARY_OFFSET,
                        bytes: beneficiary.to_bytes().to_vec(),
                    },
                ],
            )
            .await?;

        accounts
            .into_iter()
            .map(|(address, account)| Ok((address, decode_anchor(&address, &account.data)?)))
            .collect()
    }

    /// Polls the epoch until the ticket unlocks and returns that epoch.
    /// Never gives up on its own; drop the future to stop waiting.
    pub async fn wait_until_redeemable(&self, ticket: &ProxyTicket) -> ClientResult<u64> {
        loop {
            let epoch = self.ledger.current_epoch().await?;
            if is_redeemable(ticket, epoch) {
                return Ok(epoch);
            }
            debug!(
                target: "sunrise::ticket",
                epoch,
                unlock_epoch = ticket.unlock_epoch,
                "ticket still locked"
            );
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    pub async fn redeem(&self, ticket: Pubkey) -> ClientResult<Signature> {
        let ledger = self.ledger.as_ref();
        let proxy_ticket: ProxyTicket = fetch_anchor(ledger, &ticket).await?;
        let state: BeamState = fetch_anchor(ledger, &proxy_ticket.beam).await?;

        let ix = redeem_ticket_instruction(proxy_ticket.beam, &state, ticket, &proxy_ticket);
        let signature = self.ledger.submit(PendingTransaction::new(vec![ix])).await?;
        info!(target: "sunrise::ticket", %ticket, lamports = proxy_ticket.lamports, %signature, "ticket redeemed");

        Ok(signature)
    }

    /// Redeems every unlocked ticket of `beneficiary`, one transaction per ticket
    pub async fn redeem_all_ready(&self, beneficiary: &Pubkey) -> ClientResult<Vec<Redemption>> {
        let epoch = self.ledger.current_epoch().await?;
        let tickets = self.fetch_tickets(beneficiary).await?;
        let mut beams: HashMap<Pubkey, BeamState> = HashMap::new();
        let mut redemptions = Vec::new();

        for (address, ticket) in tickets {
            if !is_redeemable(&ticket, epoch) {
                continue;
            }

            if !beams.contains_key(&ticket.beam) {
                let state: BeamState = fetch_anchor(self.ledger.as_ref(), &ticket.beam).await?;
                beams.insert(ticket.beam, state);
            }
            let Some(state) = beams.get(&ticket.beam) else {
                continue;
            };

            let ix = redeem_ticket_instruction(ticket.beam, state, address, &ticket);
            let outcome = self.ledger.submit(PendingTransaction::new(vec![ix])).await;
            match &outcome {
                Ok(signature) => {
                    info!(target: "sunrise::ticket", ticket = %address, lamports = ticket.lamports, %signature, "ticket redeemed")
                }
                Err(error) => {
                    warn!(target: "sunrise::ticket", ticket = %address, %error, "ticket redemption failed")
                }
            }

            redemptions.push(Redemption {
                ticket: address,
                lamports: ticket.lamports,
                outcome,
            });
        }

        Ok(redemptions)
    }
}
