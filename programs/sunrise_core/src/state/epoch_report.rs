// sunrise_core/state/epoch_report.rs

use anchor_lang::prelude::*;

use crate::errors::CoreError;

type CoreResult<T> = std::result::Result<T, CoreError>;

#[constant]
pub const EPOCH_REPORT_SEED: &[u8] = b"epoch_report";

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BeamEpochDetails {
    pub epoch: u64,             // epoch the entry was last written in
    pub extractable_yield: u64, // yield the beam reported as extractable, less what was extracted since
    pub extracted_yield: u64,   // running total extracted through this beam, never decreases
    pub updated: bool,          // set by the first update written to this slot
}

impl BeamEpochDetails {
    pub const SIZE: usize = 8 + // epoch
        8 + // extractable_yield
        8 + // extracted_yield
        1; // updated

    pub fn is_current(&self, epoch: u64) -> bool {
        self.updated && self.epoch == epoch
    }
}

/// Per-epoch yield bookkeeping, one entry per beam slot of the linked state.
#[account]
#[derive(Debug, Default)]
pub struct EpochReport {
    pub state: Pubkey,
    pub current_gsol_supply: u64, // mint supply at the time of the last update
    pub beam_epoch_details: Vec<BeamEpochDetails>,
}

impl EpochReport {
    pub fn size(capacity: usize) -> usize {
        8 + // discriminator
        32 + // state
        8 + // current_gsol_supply
        4 + // beam_epoch_details vector length prefix
        capacity * BeamEpochDetails::SIZE // beam_epoch_details vector elements
    }

    pub fn register(&mut self, state: Pubkey, capacity: usize) {
        self.state = state;
        self.current_gsol_supply = 0;
        self.beam_epoch_details = vec![BeamEpochDetails::default(); capacity];
    }

    pub fn resize(&mut self, capacity: usize) {
        self.beam_epoch_details
            .resize(capacity, BeamEpochDetails::default());
    }

    pub fn clear_slot(&mut self, idx: usize) {
        if let Some(details) = self.beam_epoch_details.get_mut(idx) {
            *details = BeamEpochDetails::default();
        }
    }

    /// Writes the beam's extractable yield for `current_epoch`, once per epoch.
    pub fn record_update(
        &mut self,
        idx: usize,
        reported_epoch: u64,
        current_epoch: u64,
        extractable_yield: u64,
        gsol_supply: u64,
    ) -> CoreResult<()> {
        if reported_epoch != current_epoch {
            return Err(CoreError::IncorrectBeamEpochReportEpoch);
        }
        let details = self
            .beam_epoch_details
            .get_mut(idx)
            .ok_or(CoreError::IncorrectBeamEpochReportCount)?;
        if details.is_current(current_epoch) || details.epoch > current_epoch {
            return Err(CoreError::EpochReportAlreadyUpdated);
        }

        details.epoch = current_epoch;
        details.extractable_yield = extractable_yield;
        details.updated = true;
        self.current_gsol_supply = gsol_supply;

        Ok(())
    }

    /// Moves `amount` from the beam's extractable to its extracted yield.
    pub fn record_extraction(&mut self, idx: usize, current_epoch: u64, amount: u64) -> CoreResult<()> {
        let details = self
            .beam_epoch_details
            .get_mut(idx)
            .ok_or(CoreError::IncorrectBeamEpochReportCount)?;
        if !details.is_current(current_epoch) {
            return Err(CoreError::EpochReportNotUpToDate);
        }

        details.extractable_yield = details
            .extractable_yield
            .checked_sub(amount)
            .ok_or(CoreError::Overflow)?;
        details.extracted_yield = details
            .extracted_yield
            .checked_add(amount)
            .ok_or(CoreError::Overflow)?;

        Ok(())
    }

    pub fn total_extractable_yield(&self) -> u64 {
        self.beam_epoch_details
            .iter()
            .fold(0u64, |acc, d| acc.saturating_add(d.extractable_yield))
    }

    pub fn total_extracted_yield(&self) -> u64 {
        self.beam_epoch_details
            .iter()
            .fold(0u64, |acc, d| acc.saturating_add(d.extracted_yield))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(capacity: usize) -> EpochReport {
        let mut report = EpochReport::default();
        report.register(Pubkey::new_unique(), capacity);
        report
    }

    #[test]
    fn one_update_per_epoch() {
        let mut report = report(2);

        report.record_update(0, 10, 10, 500, 9_000).unwrap();
        assert_eq!(report.current_gsol_supply, 9_000);
        assert!(matches!(
            report.record_update(0, 10, 10, 700, 9_100),
            Err(CoreError::EpochReportAlreadyUpdated)
        ));
        assert_eq!(report.beam_epoch_details[0].extractable_yield, 500);
        assert_eq!(report.current_gsol_supply, 9_000);

        // the other beam has its own entry
        report.record_update(1, 10, 10, 100, 9_100).unwrap();
        // and the next epoch opens a new window
        report.record_update(0, 11, 11, 650, 9_200).unwrap();
        assert_eq!(report.beam_epoch_details[0].epoch, 11);
    }

    #[test]
    fn zero_yield_update_in_epoch_zero_counts() {
        let mut report = report(1);
        assert!(!report.beam_epoch_details[0].is_current(0));

        report.record_update(0, 0, 0, 0, 0).unwrap();
        assert!(report.beam_epoch_details[0].is_current(0));
        assert!(matches!(
            report.record_update(0, 0, 0, 500, 0),
            Err(CoreError::EpochReportAlreadyUpdated)
        ));
        report.record_extraction(0, 0, 0).unwrap();
    }

    #[test]
    fn stale_reports_are_rejected() {
        let mut report = report(1);

        assert!(matches!(
            report.record_update(0, 9, 10, 500, 0),
            Err(CoreError::IncorrectBeamEpochReportEpoch)
        ));
        assert!(matches!(
            report.record_update(3, 10, 10, 500, 0),
            Err(CoreError::IncorrectBeamEpochReportCount)
        ));
    }

    #[test]
    fn extraction_requires_a_current_report() {
        let mut report = report(1);

        assert!(matches!(
            report.record_extraction(0, 10, 1),
            Err(CoreError::EpochReportNotUpToDate)
        ));

        report.record_update(0, 10, 10, 500, 0).unwrap();
        assert!(matches!(
            report.record_extraction(0, 11, 1),
            Err(CoreError::EpochReportNotUpToDate)
        ));
    }

    #[test]
    fn extraction_is_bounded_by_extractable_yield() {
        let mut report = report(1);
        report.record_update(0, 10, 10, 500, 0).unwrap();

        report.record_extraction(0, 10, 300).unwrap();
        assert!(matches!(
            report.record_extraction(0, 10, 201),
            Err(CoreError::Overflow)
        ));
        report.record_extraction(0, 10, 200).unwrap();

        let details = report.beam_epoch_details[0];
        assert_eq!(details.extractable_yield, 0);
        assert_eq!(details.extracted_yield, 500);
    }

    #[test]
    fn extracted_yield_never_decreases_across_epochs() {
        let mut report = report(1);
        report.record_update(0, 10, 10, 500, 0).unwrap();
        report.record_extraction(0, 10, 500).unwrap();

        report.record_update(0, 11, 11, 80, 0).unwrap();
        report.record_extraction(0, 11, 80).unwrap();

        assert_eq!(report.total_extracted_yield(), 580);
        assert_eq!(report.total_extractable_yield(), 0);
    }

    #[test]
    fn cleared_slots_start_over() {
        let mut report = report(2);
        report.record_update(1, 10, 10, 500, 0).unwrap();

        report.clear_slot(1);
        report.resize(4);

        assert_eq!(report.beam_epoch_details.len(), 4);
        assert_eq!(report.beam_epoch_details[1], BeamEpochDetails::default());
        assert_eq!(
            EpochReport::size(4) - EpochReport::size(2),
            2 * BeamEpochDetails::SIZE
        );
    }
}
