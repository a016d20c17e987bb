mod common;

use std::sync::Arc;
use std::time::Duration;

use anchor_lang::InstructionData;
use solana_sdk::pubkey::Pubkey;
use spl_beam::{
    instruction as beam_ix,
    state::{BeamState, ProxyTicket},
};
use sunrise_client::{
    beams::stake_pool::vault_authority_address, error::ClientError, tickets::TicketClient,
};

use common::InMemoryLedger;

struct Fixture {
    ledger: Arc<InMemoryLedger>,
    beam: Pubkey,
    treasury: Pubkey,
    beneficiary: Pubkey,
}

fn fixture() -> Fixture {
    let ledger = InMemoryLedger::new(Pubkey::new_unique());
    let beam = Pubkey::new_unique();
    let treasury = Pubkey::new_unique();
    ledger.set_anchor_account(
        beam,
        spl_beam::ID,
        &BeamState {
            update_authority: Pubkey::new_unique(),
            stake_pool: Pubkey::new_unique(),
            sunrise_state: Pubkey::new_unique(),
            vault_authority_bump: 255,
            treasury,
            bump: 255,
        },
    );

    Fixture {
        ledger,
        beam,
        treasury,
        beneficiary: Pubkey::new_unique(),
    }
}

fn add_ticket(fixture: &Fixture, beneficiary: Pubkey, lamports: u64, unlock_epoch: u64) -> Pubkey {
    let address = Pubkey::new_unique();
    fixture.ledger.set_anchor_account(
        address,
        spl_beam::ID,
        &ProxyTicket {
            sunrise_state: Pubkey::new_unique(),
            beam: fixture.beam,
            stake_account: Pubkey::new_unique(),
            beneficiary,
            lamports,
            unlock_epoch,
            bump: 255,
        },
    );
    address
}

#[tokio::test]
async fn fetches_only_the_beneficiarys_tickets() {
    let f = fixture();
    let mine = add_ticket(&f, f.beneficiary, 1_000, 10);
    add_ticket(&f, Pubkey::new_unique(), 2_000, 10);

    let client = TicketClient::new(f.ledger.clone(), Duration::from_millis(1));
    let tickets = client.fetch_tickets(&f.beneficiary).await.unwrap();

    assert_eq!(tickets.len(), 1);
    assert_eq!(tickets[0].0, mine);
    assert_eq!(tickets[0].1.lamports, 1_000);
}

#[tokio::test]
async fn redeems_only_unlocked_tickets() {
    let f = fixture();
    let ready = add_ticket(&f, f.beneficiary, 1_000, 4);
    add_ticket(&f, f.beneficiary, 2_000, 6);
    f.ledger.set_epoch(5);

    let client = TicketClient::new(f.ledger.clone(), Duration::from_millis(1));
    let redemptions = client.redeem_all_ready(&f.beneficiary).await.unwrap();

    assert_eq!(redemptions.len(), 1);
    assert_eq!(redemptions[0].ticket, ready);
    assert_eq!(redemptions[0].lamports, 1_000);
    assert!(redemptions[0].outcome.is_ok());

    let submitted = f.ledger.submitted();
    assert_eq!(submitted.len(), 1);
    let ix = &submitted[0][0];
    assert_eq!(ix.program_id, spl_beam::ID);
    assert_eq!(ix.data, beam_ix::RedeemTicket {}.data());
    assert_eq!(ix.accounts[0].pubkey, f.beam);
    assert_eq!(ix.accounts[1].pubkey, ready);
    assert_eq!(ix.accounts[2].pubkey, f.beneficiary);
    assert_eq!(ix.accounts[3].pubkey, f.treasury);
    assert_eq!(ix.accounts[5].pubkey, vault_authority_address(&f.beam).0);
}

#[tokio::test]
async fn failed_redemption_does_not_stop_the_rest() {
    let f = fixture();
    add_ticket(&f, f.beneficiary, 1_000, 1);
    add_ticket(&f, f.beneficiary, 2_000, 1);
    f.ledger.set_epoch(2);
    f.ledger.reject_next(ClientError::transport("node unavailable"));

    let client = TicketClient::new(f.ledger.clone(), Duration::from_millis(1));
    let redemptions = client.redeem_all_ready(&f.beneficiary).await.unwrap();

    assert_eq!(redemptions.len(), 2);
    assert_eq!(redemptions.iter().filter(|r| r.outcome.is_ok()).count(), 1);
    assert_eq!(f.ledger.submitted().len(), 1);
}

#[tokio::test]
async fn waits_for_the_unlock_epoch() {
    let f = fixture();
    let address = add_ticket(&f, f.beneficiary, 1_000, 7);
    f.ledger.set_epoch(6);

    let client = TicketClient::new(f.ledger.clone(), Duration::from_millis(1));
    let ticket = client
        .fetch_tickets(&f.beneficiary)
        .await
        .unwrap()
        .into_iter()
        .find(|(a, _)| *a == address)
        .unwrap()
        .1;

    let ledger = f.ledger.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        ledger.set_epoch(7);
    });

    let epoch = tokio::time::timeout(Duration::from_secs(5), client.wait_until_redeemable(&ticket))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(epoch, 7);

    client.redeem(address).await.unwrap();
    assert_eq!(f.ledger.submitted().len(), 1);
}
