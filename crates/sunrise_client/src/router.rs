//! Routes deposits and withdrawals across beams according to their allocations
//!
//! Deposits are split over the capable beams in registration order, each leg bounded by
//! the beam's share of the effective supply. Every leg is its own transaction, so a
//! deposit can land partially; the [`DepositReport`] records each leg and failed legs
//! can be retried on their own. Withdrawals are never split and go to a single beam.

use std::sync::Arc;

use solana_sdk::{pubkey::Pubkey, signature::Signature};
use sunrise_core::constants::ONE_HUNDRED_PERCENT;
use tracing::{info, warn};

use crate::{
    beams::{BeamAdapter, BeamCapability, BeamView, OrderedWithdrawal, WithdrawnStake},
    core::{CoreClient, CoreView},
    error::{ClientError, ClientResult, PreconditionError},
    snapshot::Snapshot,
};

/// A beam eligible for a request, with its share of the effective supply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub beam: Pubkey,
    pub allocation: u8,
}

/// One sub-amount of a routed request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Leg {
    pub beam: Pubkey,
    pub lamports: u64,
}

/// Largest amount the beam may take given the effective supply
pub fn window(effective_supply: u64, allocation: u8) -> u64 {
    let window = u128::from(effective_supply) * u128::from(allocation)
        / u128::from(ONE_HUNDRED_PERCENT);
    u64::try_from(window).unwrap_or(u64::MAX)
}

/// Splits `amount` across `candidates`, which must be in registration order.
pub fn split(
    amount: u64,
    effective_supply: u64,
    candidates: &[Candidate],
    capability: BeamCapability,
) -> Result<Vec<Leg>, PreconditionError> {
    if amount == 0 {
        return Err(PreconditionError::ZeroAmount);
    }
    let first = candidates
        .first()
        .ok_or(PreconditionError::NoCapableBeam(capability))?;

    if effective_supply == 0 {
        return Ok(vec![Leg {
            beam: first.beam,
            lamports: amount,
        }]);
    }

    let mut remaining = amount;
    let mut legs = Vec::new();
    for candidate in candidates {
        if remaining == 0 {
            break;
        }
        let lamports = window(effective_supply, candidate.allocation).min(remaining);
        if lamports == 0 {
            continue;
        }
        legs.push(Leg {
            beam: candidate.beam,
            lamports,
        });
        remaining -= lamports;
    }

    if remaining > 0 {
        return Err(PreconditionError::InadequateCapacity {
            requested: amount,
            missing: remaining,
        });
    }

    Ok(legs)
}

/// Core and beam reads taken in the same refresh round
#[derive(Debug, Clone)]
pub struct RouterView {
    pub core: CoreView,
    pub beams: Vec<BeamView>,
}

impl RouterView {
    /// Registered beams that can serve `capability`, in registration order.
    /// Draining beams are excluded from deposits.
    pub fn candidates(&self, capability: BeamCapability) -> Vec<Candidate> {
        self.core
            .beams()
            .filter(|details| !(capability.is_deposit() && details.draining_mode))
            .filter(|details| {
                self.beams
                    .iter()
                    .any(|view| view.key == details.key && view.capabilities.supports(capability))
            })
            .map(|details| Candidate {
                beam: details.key,
                allocation: details.allocation,
            })
            .collect()
    }

    /// First capable beam whose attributed supply covers the whole withdrawal
    pub fn withdrawal_beam(
        &self,
        capability: BeamCapability,
        lamports: u64,
    ) -> Result<Pubkey, PreconditionError> {
        if lamports == 0 {
            return Err(PreconditionError::ZeroAmount);
        }
        let candidates = self.candidates(capability);
        if candidates.is_empty() {
            return Err(PreconditionError::NoCapableBeam(capability));
        }

        candidates
            .iter()
            .filter_map(|c| self.core.beam(&c.beam))
            .find(|details| details.partial_gsol_supply >= lamports)
            .map(|details| details.key)
            .ok_or(PreconditionError::InadequateCapacity {
                requested: lamports,
                missing: lamports,
            })
    }

    /// First capable beam whose deposit window takes the whole amount
    pub fn single_deposit_beam(
        &self,
        capability: BeamCapability,
        lamports: u64,
    ) -> Result<Pubkey, PreconditionError> {
        let candidates = self.candidates(capability);
        let effective_supply = self.core.effective_supply();
        if effective_supply == 0 {
            return candidates
                .first()
                .map(|c| c.beam)
                .ok_or(PreconditionError::NoCapableBeam(capability));
        }
        if candidates.is_empty() {
            return Err(PreconditionError::NoCapableBeam(capability));
        }

        candidates
            .iter()
            .find(|c| window(effective_supply, c.allocation) >= lamports)
            .map(|c| c.beam)
            .ok_or(PreconditionError::InadequateCapacity {
                requested: lamports,
                missing: lamports,
            })
    }
}

#[derive(Debug)]
pub struct LegReport {
    pub leg: Leg,
    pub outcome: Result<Signature, ClientError>,
}

impl LegReport {
    pub fn is_confirmed(&self) -> bool {
        self.outcome.is_ok()
    }
}

#[derive(Debug)]
pub struct DepositReport {
    pub recipient: Option<Pubkey>,
    pub legs: Vec<LegReport>,
}

impl DepositReport {
    pub fn is_complete(&self) -> bool {
        self.legs.iter().all(LegReport::is_confirmed)
    }

    pub fn deposited(&self) -> u64 {
        self.legs
            .iter()
            .filter(|leg| leg.is_confirmed())
            .map(|leg| leg.leg.lamports)
            .sum()
    }

    pub fn failed_legs(&self) -> impl Iterator<Item = &LegReport> {
        self.legs.iter().filter(|leg| !leg.is_confirmed())
    }

    pub fn failed_lamports(&self) -> u64 {
        self.failed_legs().map(|leg| leg.leg.lamports).sum()
    }
}

pub struct Router {
    core: Arc<CoreClient>,
    beams: Vec<Arc<dyn BeamAdapter>>,
}

impl Router {
    pub fn new(core: Arc<CoreClient>, beams: Vec<Arc<dyn BeamAdapter>>) -> Self {
        Self { core, beams }
    }

    pub fn core(&self) -> &Arc<CoreClient> {
        &self.core
    }

    pub fn beam(&self, key: &Pubkey) -> Option<&Arc<dyn BeamAdapter>> {
        self.beams.iter().find(|beam| beam.key() == *key)
    }

    fn adapter(&self, key: &Pubkey) -> ClientResult<&Arc<dyn BeamAdapter>> {
        self.beam(key)
            .ok_or_else(|| PreconditionError::AccountNotFound(*key).into())
    }

    /// Reads the core and every beam as one generation
    pub async fn refresh(&self) -> ClientResult<Snapshot<RouterView>> {
        let core = self.core.refresh().await?;
        let mut beams = Vec::with_capacity(self.beams.len());
        for beam in &self.beams {
            beams.push(beam.refresh(core.generation()).await?);
        }

        let generation = core.generation();
        let mut views = Vec::with_capacity(beams.len());
        for beam in beams {
            beam.ensure_generation(generation)?;
            views.push(beam.into_inner());
        }

        Ok(core.map(|core| RouterView { core, beams: views }))
    }

    fn ensure_current(&self, snapshot: &Snapshot<RouterView>) -> Result<(), PreconditionError> {
        snapshot.ensure_generation(self.core.generation())
    }

    /// Splits a SOL deposit without submitting anything
    pub fn plan_deposit(
        &self,
        snapshot: &Snapshot<RouterView>,
        lamports: u64,
    ) -> ClientResult<Vec<Leg>> {
        self.ensure_current(snapshot)?;
        let capability = BeamCapability::SolDeposit;
        let legs = split(
            lamports,
            snapshot.core.effective_supply(),
            &snapshot.candidates(capability),
            capability,
        )?;

        info!(
            target: "sunrise::router",
            generation = snapshot.generation(),
            lamports,
            effective_supply = snapshot.core.effective_supply(),
            legs = legs.len(),
            "planned deposit"
        );
        Ok(legs)
    }

    /// Deposits across beams. Preconditions fail the whole call before anything is
    /// submitted; after that each leg succeeds or fails on its own.
    pub async fn deposit(
        &self,
        snapshot: &Snapshot<RouterView>,
        lamports: u64,
        recipient: Option<Pubkey>,
    ) -> ClientResult<DepositReport> {
        let legs = self.plan_deposit(snapshot, lamports)?;
        for leg in &legs {
            self.adapter(&leg.beam)?;
        }
        Ok(self.execute(legs, recipient).await)
    }

    /// Resubmits only the legs of `report` that failed
    pub async fn retry_failed(&self, report: &DepositReport) -> ClientResult<DepositReport> {
        let legs: Vec<Leg> = report.failed_legs().map(|leg| leg.leg).collect();
        for leg in &legs {
            self.adapter(&leg.beam)?;
        }
        Ok(self.execute(legs, report.recipient).await)
    }

    async fn execute(&self, legs: Vec<Leg>, recipient: Option<Pubkey>) -> DepositReport {
        let mut reports = Vec::with_capacity(legs.len());
        for leg in legs {
            let outcome = match self.adapter(&leg.beam) {
                Ok(adapter) => adapter.deposit(leg.lamports, recipient).await,
                Err(err) => Err(err),
            };
            match &outcome {
                Ok(signature) => {
                    info!(target: "sunrise::router", beam = %leg.beam, lamports = leg.lamports, %signature, "deposit leg confirmed")
                }
                Err(error) => {
                    warn!(target: "sunrise::router", beam = %leg.beam, lamports = leg.lamports, %error, "deposit leg failed")
                }
            }
            reports.push(LegReport { leg, outcome });
        }

        DepositReport {
            recipient,
            legs: reports,
        }
    }

    /// Deposits a delegated stake account into one beam, it cannot be split
    pub async fn deposit_stake(
        &self,
        snapshot: &Snapshot<RouterView>,
        stake_account: Pubkey,
        lamports: u64,
        recipient: Option<Pubkey>,
    ) -> ClientResult<Signature> {
        self.ensure_current(snapshot)?;
        let beam = snapshot.single_deposit_beam(BeamCapability::StakeDeposit, lamports)?;
        self.adapter(&beam)?
            .deposit_stake(stake_account, recipient)
            .await
    }

    pub fn select_withdrawal_beam(
        &self,
        snapshot: &Snapshot<RouterView>,
        capability: BeamCapability,
        lamports: u64,
    ) -> ClientResult<&Arc<dyn BeamAdapter>> {
        self.ensure_current(snapshot)?;
        let beam = snapshot.withdrawal_beam(capability, lamports)?;
        info!(target: "sunrise::router", %beam, ?capability, lamports, "selected withdrawal beam");
        self.adapter(&beam)
    }

    pub async fn withdraw(
        &self,
        snapshot: &Snapshot<RouterView>,
        lamports: u64,
    ) -> ClientResult<Signature> {
        self.select_withdrawal_beam(snapshot, BeamCapability::LiquidUnstake, lamports)?
            .withdraw(lamports)
            .await
    }

    pub async fn withdraw_stake(
        &self,
        snapshot: &Snapshot<RouterView>,
        lamports: u64,
    ) -> ClientResult<WithdrawnStake> {
        self.select_withdrawal_beam(snapshot, BeamCapability::StakeWithdrawal, lamports)?
            .withdraw_stake(lamports)
            .await
    }

    pub async fn order_withdraw(
        &self,
        snapshot: &Snapshot<RouterView>,
        lamports: u64,
    ) -> ClientResult<OrderedWithdrawal> {
        self.select_withdrawal_beam(snapshot, BeamCapability::OrderUnstake, lamports)?
            .order_withdraw(lamports)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates(allocations: &[u8]) -> Vec<Candidate> {
        allocations
            .iter()
            .map(|allocation| Candidate {
                beam: Pubkey::new_unique(),
                allocation: *allocation,
            })
            .collect()
    }

    #[test]
    fn splits_in_registration_order() {
        let beams = candidates(&[50, 50]);

        let legs = split(800_000, 1_000_000, &beams, BeamCapability::SolDeposit).unwrap();

        assert_eq!(
            legs,
            vec![
                Leg {
                    beam: beams[0].beam,
                    lamports: 500_000
                },
                Leg {
                    beam: beams[1].beam,
                    lamports: 300_000
                },
            ]
        );
    }

    #[test]
    fn empty_supply_goes_to_first_beam() {
        let beams = candidates(&[0, 100]);

        let legs = split(5_000, 0, &beams, BeamCapability::SolDeposit).unwrap();

        assert_eq!(
            legs,
            vec![Leg {
                beam: beams[0].beam,
                lamports: 5_000
            }]
        );
    }

    #[test]
    fn skips_zero_windows() {
        let beams = candidates(&[0, 100]);

        let legs = split(10, 1_000, &beams, BeamCapability::SolDeposit).unwrap();

        assert_eq!(legs.len(), 1);
        assert_eq!(legs[0].beam, beams[1].beam);
    }

    #[test]
    fn inadequate_capacity_iff_windows_fall_short() {
        let beams = candidates(&[30, 70]);
        let supply = 1_000_001;
        let total: u64 = beams.iter().map(|c| window(supply, c.allocation)).sum();

        assert!(split(total, supply, &beams, BeamCapability::SolDeposit).is_ok());
        assert_eq!(
            split(total + 1, supply, &beams, BeamCapability::SolDeposit),
            Err(PreconditionError::InadequateCapacity {
                requested: total + 1,
                missing: 1
            })
        );
    }

    #[test]
    fn never_assigns_more_than_requested() {
        let beams = candidates(&[20, 30, 50]);
        for amount in [1, 7, 199_999, 200_000, 1_000_000] {
            let legs = split(amount, 1_000_000, &beams, BeamCapability::SolDeposit).unwrap();
            assert_eq!(legs.iter().map(|l| l.lamports).sum::<u64>(), amount);
        }
    }

    #[test]
    fn no_candidates() {
        assert_eq!(
            split(1, 100, &[], BeamCapability::SolDeposit),
            Err(PreconditionError::NoCapableBeam(BeamCapability::SolDeposit))
        );
        assert_eq!(
            split(0, 100, &candidates(&[100]), BeamCapability::SolDeposit),
            Err(PreconditionError::ZeroAmount)
        );
    }
}
