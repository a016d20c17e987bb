// sunrise_core/state/core_state.rs

use anchor_lang::prelude::*;

use super::{AllocationUpdate, BeamDetails};
use crate::{
    constants::{MAX_BEAM_CAPACITY, ONE_HUNDRED_PERCENT},
    errors::CoreError,
};

type CoreResult<T> = std::result::Result<T, CoreError>;

#[account]
#[derive(Debug, Default)]
pub struct CoreState {
    pub update_authority: Pubkey,   // can register beams and change allocations
    pub gsol_mint: Pubkey,          // receipt token mint
    pub pre_supply: u64,            // gsol supply when this state took over minting
    pub gsol_mint_authority_bump: u8,
    pub epoch_report_bump: u8,
    pub yield_account: Pubkey,      // receives extracted yield
    pub reserved: [u64; 16],
    pub allocations: Vec<BeamDetails>, // fixed capacity, empty slots are default entries
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct RegisterStateInput {
    pub update_authority: Pubkey,
    pub yield_account: Pubkey,
    pub initial_capacity: u8,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default)]
pub struct UpdateStateInput {
    pub new_update_authority: Option<Pubkey>,
    pub new_yield_account: Option<Pubkey>,
    pub new_gsol_mint: Option<Pubkey>,
    pub new_gsol_mint_authority_bump: Option<u8>,
}

impl CoreState {
    pub fn size(capacity: usize) -> usize {
        8 + // discriminator
        32 + // update_authority
        32 + // gsol_mint
        8 + // pre_supply
        1 + // gsol_mint_authority_bump
        1 + // epoch_report_bump
        32 + // yield_account
        16 * 8 + // reserved
        4 + // allocations vector length prefix
        capacity * BeamDetails::SIZE // allocations vector elements
    }

    pub fn register(
        &mut self,
        input: RegisterStateInput,
        gsol_mint: Pubkey,
        pre_supply: u64,
        gsol_mint_authority_bump: u8,
        epoch_report_bump: u8,
    ) {
        self.update_authority = input.update_authority;
        self.yield_account = input.yield_account;
        self.gsol_mint = gsol_mint;
        self.pre_supply = pre_supply;
        self.gsol_mint_authority_bump = gsol_mint_authority_bump;
        self.epoch_report_bump = epoch_report_bump;
        self.allocations = vec![BeamDetails::default(); input.initial_capacity as usize];
    }

    pub fn update(&mut self, input: UpdateStateInput) {
        if let Some(update_authority) = input.new_update_authority {
            self.update_authority = update_authority;
        }
        if let Some(yield_account) = input.new_yield_account {
            self.yield_account = yield_account;
        }
        if let Some(gsol_mint) = input.new_gsol_mint {
            self.gsol_mint = gsol_mint;
        }
        if let Some(bump) = input.new_gsol_mint_authority_bump {
            self.gsol_mint_authority_bump = bump;
        }
    }

    pub fn capacity(&self) -> usize {
        self.allocations.len()
    }

    pub fn beam_count(&self) -> usize {
        self.allocations.iter().filter(|b| !b.is_empty()).count()
    }

    pub fn find_beam_index(&self, key: &Pubkey) -> Option<usize> {
        if *key == Pubkey::default() {
            return None;
        }
        self.allocations.iter().position(|b| b.key == *key)
    }

    pub fn contains_beam(&self, key: &Pubkey) -> bool {
        self.find_beam_index(key).is_some()
    }

    pub fn get_beam_details(&self, key: &Pubkey) -> Option<&BeamDetails> {
        self.find_beam_index(key).map(|idx| &self.allocations[idx])
    }

    pub fn get_mut_beam_details(&mut self, key: &Pubkey) -> Option<&mut BeamDetails> {
        self.find_beam_index(key)
            .map(move |idx| &mut self.allocations[idx])
    }

    /// Places the beam in the first free slot and returns the slot index.
    pub fn add_beam(&mut self, beam: BeamDetails) -> CoreResult<usize> {
        if beam.is_empty() {
            return Err(CoreError::InvalidParameter);
        }
        if self.contains_beam(&beam.key) {
            return Err(CoreError::DuplicateBeamEntry);
        }

        let idx = self
            .allocations
            .iter()
            .position(BeamDetails::is_empty)
            .ok_or(CoreError::NoSpaceInAllocations)?;
        self.allocations[idx] = beam;

        Ok(idx)
    }

    /// Zeroes the beam's slot in place and returns its index.
    pub fn remove_beam(&mut self, key: &Pubkey) -> CoreResult<usize> {
        let idx = self.find_beam_index(key).ok_or(CoreError::UnidentifiedBeam)?;
        if self.allocations[idx].allocation != 0 {
            return Err(CoreError::NonZeroAllocation);
        }
        self.allocations[idx] = BeamDetails::default();

        Ok(idx)
    }

    /// Applies all updates or none. The registered allocations must add up to 100 afterwards.
    pub fn update_allocations(&mut self, updates: &[AllocationUpdate]) -> CoreResult<()> {
        let mut allocations = self.allocations.clone();

        for update in updates {
            if update.new_allocation > ONE_HUNDRED_PERCENT {
                return Err(CoreError::InvalidParameter);
            }
            let idx = self
                .find_beam_index(&update.beam)
                .ok_or(CoreError::UnidentifiedBeam)?;
            allocations[idx].allocation = update.new_allocation;
        }

        let sum: u32 = allocations
            .iter()
            .filter(|b| !b.is_empty())
            .map(|b| u32::from(b.allocation))
            .sum();
        if sum != u32::from(ONE_HUNDRED_PERCENT) {
            return Err(CoreError::InvalidParameter);
        }

        self.allocations = allocations;
        Ok(())
    }

    pub fn extend_capacity(&mut self, additional: usize) -> CoreResult<()> {
        if additional == 0 {
            return Err(CoreError::InvalidParameter);
        }
        let new_capacity = self
            .capacity()
            .checked_add(additional)
            .ok_or(CoreError::Overflow)?;
        if new_capacity > MAX_BEAM_CAPACITY {
            return Err(CoreError::WouldExceedBeamCapacity);
        }
        self.allocations.resize(new_capacity, BeamDetails::default());

        Ok(())
    }

    pub fn set_draining_mode(&mut self, key: &Pubkey, draining_mode: bool) -> CoreResult<()> {
        let details = self
            .get_mut_beam_details(key)
            .ok_or(CoreError::UnidentifiedBeam)?;
        details.draining_mode = draining_mode;

        Ok(())
    }

    /// Circulating supply attributable to the beams.
    pub fn effective_supply(&self, mint_supply: u64) -> u64 {
        mint_supply.saturating_sub(self.pre_supply)
    }

    /// Checks the beam's mint window against the current mint supply and records the mint.
    pub fn record_mint(&mut self, key: &Pubkey, amount: u64, mint_supply: u64) -> CoreResult<()> {
        let effective_supply = self.effective_supply(mint_supply);
        let details = self
            .get_mut_beam_details(key)
            .ok_or(CoreError::UnidentifiedBeam)?;

        if details.draining_mode {
            return Err(CoreError::BeamDraining);
        }

        let window = details.mint_window(effective_supply, amount)?;
        if details.partial_gsol_supply > window {
            msg!(
                "Beam supply {}, mint window {}",
                details.partial_gsol_supply,
                window
            );
            return Err(CoreError::MintWindowExceeded);
        }

        details.partial_gsol_supply = details
            .partial_gsol_supply
            .checked_add(amount)
            .ok_or(CoreError::Overflow)?;

        Ok(())
    }

    pub fn record_burn(&mut self, key: &Pubkey, amount: u64) -> CoreResult<()> {
        let details = self
            .get_mut_beam_details(key)
            .ok_or(CoreError::UnidentifiedBeam)?;

        if details.partial_gsol_supply < amount {
            msg!(
                "Beam supply {}, requested burn {}",
                details.partial_gsol_supply,
                amount
            );
            return Err(CoreError::BurnWindowExceeded);
        }
        details.partial_gsol_supply -= amount;

        Ok(())
    }

    pub fn record_transfer(&mut self, from: &Pubkey, to: &Pubkey, amount: u64) -> CoreResult<()> {
        if !self.contains_beam(to) {
            return Err(CoreError::UnidentifiedBeam);
        }
        self.record_burn(from, amount)?;

        let target = self
            .get_mut_beam_details(to)
            .ok_or(CoreError::UnidentifiedBeam)?;
        target.partial_gsol_supply = target
            .partial_gsol_supply
            .checked_add(amount)
            .ok_or(CoreError::Overflow)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registered(capacity: u8) -> CoreState {
        let mut state = CoreState::default();
        state.register(
            RegisterStateInput {
                update_authority: Pubkey::new_unique(),
                yield_account: Pubkey::new_unique(),
                initial_capacity: capacity,
            },
            Pubkey::new_unique(),
            0,
            254,
            253,
        );
        state
    }

    fn with_beams(allocations: &[u8]) -> (CoreState, Vec<Pubkey>) {
        let mut state = registered(allocations.len() as u8);
        let keys: Vec<Pubkey> = allocations.iter().map(|_| Pubkey::new_unique()).collect();
        for key in &keys {
            state.add_beam(BeamDetails::new(*key)).unwrap();
        }
        let updates: Vec<AllocationUpdate> = keys
            .iter()
            .zip(allocations)
            .map(|(beam, new_allocation)| AllocationUpdate {
                beam: *beam,
                new_allocation: *new_allocation,
            })
            .collect();
        state.update_allocations(&updates).unwrap();
        (state, keys)
    }

    fn allocation_sum(state: &CoreState) -> u32 {
        state.allocations.iter().map(|b| u32::from(b.allocation)).sum()
    }

    #[test]
    fn register_fills_capacity_with_empty_slots() {
        let state = registered(15);

        assert_eq!(state.capacity(), 15);
        assert_eq!(state.beam_count(), 0);
        assert!(state.allocations.iter().all(|b| *b == BeamDetails::default()));
    }

    #[test]
    fn resize_grows_account_by_entry_width() {
        let mut state = registered(15);
        let before = CoreState::size(state.capacity());

        state.extend_capacity(5).unwrap();

        assert_eq!(state.capacity(), 20);
        assert_eq!(BeamDetails::SIZE, 42);
        assert_eq!(CoreState::size(state.capacity()) - before, 5 * 42);
    }

    #[test]
    fn serialized_state_matches_declared_size() {
        let (state, _) = with_beams(&[60, 40]);
        let mut data = Vec::new();
        state.try_serialize(&mut data).unwrap();

        assert_eq!(data.len(), CoreState::size(state.capacity()));
    }

    #[test]
    fn resize_is_capped() {
        let mut state = registered(60);

        assert!(matches!(
            state.extend_capacity(5),
            Err(CoreError::WouldExceedBeamCapacity)
        ));
        assert!(matches!(
            state.extend_capacity(0),
            Err(CoreError::InvalidParameter)
        ));
        assert_eq!(state.capacity(), 60);
    }

    #[test]
    fn duplicate_beam_is_rejected_without_change() {
        let mut state = registered(3);
        let beam = Pubkey::new_unique();
        state.add_beam(BeamDetails::new(beam)).unwrap();
        let before = state.allocations.clone();

        assert!(matches!(
            state.add_beam(BeamDetails::new(beam)),
            Err(CoreError::DuplicateBeamEntry)
        ));
        assert_eq!(state.allocations, before);
    }

    #[test]
    fn add_beam_needs_a_free_slot() {
        let mut state = registered(1);
        state.add_beam(BeamDetails::new(Pubkey::new_unique())).unwrap();

        assert!(matches!(
            state.add_beam(BeamDetails::new(Pubkey::new_unique())),
            Err(CoreError::NoSpaceInAllocations)
        ));

        state.extend_capacity(1).unwrap();
        assert!(matches!(
            state.add_beam(BeamDetails::new(Pubkey::new_unique())),
            Ok(1)
        ));
    }

    #[test]
    fn allocations_must_sum_to_one_hundred() {
        let (mut state, keys) = with_beams(&[50, 50]);

        let result = state.update_allocations(&[AllocationUpdate {
            beam: keys[0],
            new_allocation: 70,
        }]);

        assert!(matches!(result, Err(CoreError::InvalidParameter)));
        assert_eq!(allocation_sum(&state), 100);
        assert_eq!(state.allocations[0].allocation, 50);

        state
            .update_allocations(&[
                AllocationUpdate {
                    beam: keys[0],
                    new_allocation: 70,
                },
                AllocationUpdate {
                    beam: keys[1],
                    new_allocation: 30,
                },
            ])
            .unwrap();
        assert_eq!(allocation_sum(&state), 100);
    }

    #[test]
    fn allocations_for_unknown_beam_are_rejected() {
        let (mut state, _) = with_beams(&[100]);

        let result = state.update_allocations(&[AllocationUpdate {
            beam: Pubkey::new_unique(),
            new_allocation: 0,
        }]);

        assert!(matches!(result, Err(CoreError::UnidentifiedBeam)));
    }

    #[test]
    fn remove_beam_requires_zero_allocation_and_tombstones_slot() {
        let (mut state, keys) = with_beams(&[50, 30, 20]);

        assert!(matches!(
            state.remove_beam(&keys[1]),
            Err(CoreError::NonZeroAllocation)
        ));

        state
            .update_allocations(&[
                AllocationUpdate {
                    beam: keys[0],
                    new_allocation: 80,
                },
                AllocationUpdate {
                    beam: keys[1],
                    new_allocation: 0,
                },
            ])
            .unwrap();
        assert!(matches!(state.remove_beam(&keys[1]), Ok(1)));

        assert_eq!(state.capacity(), 3);
        assert_eq!(state.allocations[1], BeamDetails::default());
        assert_eq!(state.allocations[2].key, keys[2]);
        assert!(matches!(
            state.remove_beam(&keys[1]),
            Err(CoreError::UnidentifiedBeam)
        ));

        // the tombstone is reused
        let newcomer = Pubkey::new_unique();
        assert!(matches!(state.add_beam(BeamDetails::new(newcomer)), Ok(1)));
    }

    #[test]
    fn empty_pool_mint_is_unrestricted() {
        let (mut state, keys) = with_beams(&[50, 50]);

        state.record_mint(&keys[0], 1_000, 0).unwrap();

        assert_eq!(state.allocations[0].partial_gsol_supply, 1_000);
    }

    #[test]
    fn mint_is_rejected_once_beam_exceeds_its_window() {
        let (mut state, keys) = with_beams(&[50, 50]);
        state.allocations[0].partial_gsol_supply = 600;
        state.allocations[1].partial_gsol_supply = 400;

        // window for the first beam is 50% of 1000
        assert!(matches!(
            state.record_mint(&keys[0], 10, 1_000),
            Err(CoreError::MintWindowExceeded)
        ));
        state.record_mint(&keys[1], 10, 1_000).unwrap();
        assert_eq!(state.allocations[1].partial_gsol_supply, 410);
    }

    #[test]
    fn pre_supply_is_excluded_from_windows() {
        let (mut state, keys) = with_beams(&[50, 50]);
        state.pre_supply = 10_000;
        state.allocations[0].partial_gsol_supply = 400;

        assert_eq!(state.effective_supply(10_000), 0);
        assert_eq!(state.effective_supply(9_000), 0);
        assert!(matches!(
            state.record_mint(&keys[0], 1, 10_600),
            Err(CoreError::MintWindowExceeded)
        ));
    }

    #[test]
    fn unknown_or_draining_beams_cannot_mint() {
        let (mut state, keys) = with_beams(&[100]);

        assert!(matches!(
            state.record_mint(&Pubkey::new_unique(), 1, 0),
            Err(CoreError::UnidentifiedBeam)
        ));

        state.set_draining_mode(&keys[0], true).unwrap();
        assert!(matches!(
            state.record_mint(&keys[0], 1, 0),
            Err(CoreError::BeamDraining)
        ));
        assert_eq!(state.allocations[0].partial_gsol_supply, 0);
    }

    #[test]
    fn draining_beams_can_still_burn() {
        let (mut state, keys) = with_beams(&[100]);
        state.record_mint(&keys[0], 500, 0).unwrap();
        state.set_draining_mode(&keys[0], true).unwrap();

        state.record_burn(&keys[0], 200).unwrap();
        assert_eq!(state.allocations[0].partial_gsol_supply, 300);

        assert!(matches!(
            state.record_burn(&keys[0], 301),
            Err(CoreError::BurnWindowExceeded)
        ));
    }

    #[test]
    fn transfer_moves_partial_supply() {
        let (mut state, keys) = with_beams(&[50, 50]);
        state.allocations[0].partial_gsol_supply = 100;

        state.record_transfer(&keys[0], &keys[1], 40).unwrap();
        assert_eq!(state.allocations[0].partial_gsol_supply, 60);
        assert_eq!(state.allocations[1].partial_gsol_supply, 40);

        assert!(matches!(
            state.record_transfer(&keys[0], &Pubkey::new_unique(), 1),
            Err(CoreError::UnidentifiedBeam)
        ));
        assert!(matches!(
            state.record_transfer(&keys[0], &keys[1], 61),
            Err(CoreError::BurnWindowExceeded)
        ));
        assert_eq!(state.allocations[0].partial_gsol_supply, 60);
    }

    #[test]
    fn update_only_touches_provided_fields() {
        let mut state = registered(1);
        let mint = state.gsol_mint;
        let authority = Pubkey::new_unique();

        state.update(UpdateStateInput {
            new_update_authority: Some(authority),
            ..Default::default()
        });

        assert_eq!(state.update_authority, authority);
        assert_eq!(state.gsol_mint, mint);
        assert_eq!(state.gsol_mint_authority_bump, 254);
    }
}
