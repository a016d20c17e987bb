// spl_beam/state/beam_state.rs

use anchor_lang::prelude::*;

#[constant]
pub const STATE_SEED: &[u8] = b"sunrise_spl";

/// Beam configuration. The account's own address is the key registered with the core,
/// so it signs every core CPI.
#[account]
#[derive(Debug, Default)]
pub struct BeamState {
    pub update_authority: Pubkey,
    pub stake_pool: Pubkey,    // proxied SPL stake pool
    pub sunrise_state: Pubkey, // core state this beam is registered with
    pub vault_authority_bump: u8,
    pub treasury: Pubkey, // receives stake rewards that accrue on tickets while cooling down
    pub bump: u8,
}

impl BeamState {
    pub const SIZE: usize = 8 + // discriminator
        32 + // update_authority
        32 + // stake_pool
        32 + // sunrise_state
        1 + // vault_authority_bump
        32 + // treasury
        1; // bump

    pub fn update(&mut self, input: BeamStateInput) {
        self.update_authority = input.update_authority;
        self.treasury = input.treasury;
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct BeamStateInput {
    pub update_authority: Pubkey,
    pub treasury: Pubkey,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_matches_serialized_length() {
        let state = BeamState::default();
        let mut data = Vec::new();
        state.try_serialize(&mut data).unwrap();
        assert_eq!(data.len(), BeamState::SIZE);
    }

    #[test]
    fn update_only_touches_mutable_fields() {
        let stake_pool = Pubkey::new_unique();
        let mut state = BeamState {
            stake_pool,
            ..Default::default()
        };
        let input = BeamStateInput {
            update_authority: Pubkey::new_unique(),
            treasury: Pubkey::new_unique(),
        };

        state.update(input);

        assert_eq!(state.update_authority, input.update_authority);
        assert_eq!(state.treasury, input.treasury);
        assert_eq!(state.stake_pool, stake_pool);
    }
}
