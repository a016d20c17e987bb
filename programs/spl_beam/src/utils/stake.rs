// spl_beam/utils/stake.rs

// external dependencies
use anchor_lang::{
    prelude::*,
    solana_program::{
        borsh0_10::try_from_slice_unchecked,
        program::invoke_signed,
        stake::{self, state::StakeStateV2},
        stake_history::StakeHistory,
        sysvar::Sysvar,
    },
};

// local dependencies
use crate::{errors::SplBeamError, state::UnderlyingClaim};

#[derive(Clone)]
pub struct NativeStakeProgram;

impl anchor_lang::Id for NativeStakeProgram {
    fn id() -> Pubkey {
        stake::program::ID
    }
}

fn stake_state(stake_account: &AccountInfo) -> Result<StakeStateV2> {
    require_keys_eq!(
        *stake_account.owner,
        stake::program::ID,
        ErrorCode::AccountOwnedByWrongProgram
    );
    let data = stake_account.try_borrow_data()?;
    try_from_slice_unchecked::<StakeStateV2>(&data)
        .map_err(|_| error!(ErrorCode::AccountDidNotDeserialize))
}

/// Active stake of a delegated stake account, the amount of gSOL it backs.
pub fn delegated_stake(stake_account: &AccountInfo) -> Result<u64> {
    match stake_state(stake_account)?.delegation() {
        Some(delegation) => Ok(delegation.stake),
        None => err!(SplBeamError::NotDelegated),
    }
}

pub fn is_delegated(stake_account: &AccountInfo) -> Result<bool> {
    Ok(stake_state(stake_account)?.delegation().is_some())
}

// The slower cooldown rate applies from genesis, so a claim never overstates what the
// stake program will release.
const NEW_RATE_ACTIVATION_EPOCH: Option<u64> = Some(0);

pub fn underlying_claim(
    stake_account: &AccountInfo,
    stake_history: &AccountInfo,
    withdrawer: &Pubkey,
    current_epoch: u64,
) -> Result<UnderlyingClaim> {
    let state = stake_state(stake_account)?;
    let stake_history = StakeHistory::from_account_info(stake_history)?;
    claim_for_state(
        &state,
        stake_account.lamports(),
        withdrawer,
        current_epoch,
        &stake_history,
    )
}

// Deactivating stake cools down at the cluster rate, so it can stay partly locked for
// several epochs after deactivation.
fn claim_for_state(
    state: &StakeStateV2,
    lamports: u64,
    withdrawer: &Pubkey,
    current_epoch: u64,
    stake_history: &StakeHistory,
) -> Result<UnderlyingClaim> {
    let authorized = state
        .authorized()
        .ok_or(SplBeamError::InvalidStakeAuthority)?;
    require_keys_eq!(
        authorized.withdrawer,
        *withdrawer,
        SplBeamError::InvalidStakeAuthority
    );

    let locked = match state.delegation() {
        Some(delegation) if current_epoch >= delegation.deactivation_epoch => {
            delegation
                .stake_activating_and_deactivating(
                    current_epoch,
                    stake_history,
                    NEW_RATE_ACTIVATION_EPOCH,
                )
                .effective
        }
        Some(delegation) => delegation.stake,
        None => 0,
    };
    let withdrawable = lamports.saturating_sub(locked);

    Ok(UnderlyingClaim {
        lamports,
        withdrawable,
    })
}

pub fn deactivate<'info>(
    stake_account: &AccountInfo<'info>,
    stake_authority: &AccountInfo<'info>,
    clock: &AccountInfo<'info>,
    authority_seeds: &[&[&[u8]]],
) -> Result<()> {
    invoke_signed(
        &stake::instruction::deactivate_stake(stake_account.key, stake_authority.key),
        &[
            stake_account.clone(),
            clock.clone(),
            stake_authority.clone(),
        ],
        authority_seeds,
    )?;

    Ok(())
}

pub fn withdraw<'info>(
    stake_account: &AccountInfo<'info>,
    withdraw_authority: &AccountInfo<'info>,
    to: &AccountInfo<'info>,
    clock: &AccountInfo<'info>,
    stake_history: &AccountInfo<'info>,
    lamports: u64,
    authority_seeds: &[&[&[u8]]],
) -> Result<()> {
    invoke_signed(
        &stake::instruction::withdraw(
            stake_account.key,
            withdraw_authority.key,
            to.key,
            lamports,
            None,
        ),
        &[
            stake_account.clone(),
            to.clone(),
            clock.clone(),
            stake_history.clone(),
            withdraw_authority.clone(),
        ],
        authority_seeds,
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchor_lang::solana_program::{
        stake::{
            stake_flags::StakeFlags,
            state::{Authorized, Delegation, Meta, Stake},
        },
        stake_history::StakeHistoryEntry,
    };

    fn delegated(withdrawer: Pubkey, stake: u64, deactivation_epoch: u64) -> StakeStateV2 {
        let meta = Meta {
            authorized: Authorized {
                staker: withdrawer,
                withdrawer,
            },
            ..Meta::default()
        };
        let delegation = Delegation {
            deactivation_epoch,
            ..Delegation::new(&Pubkey::new_unique(), stake, 0)
        };
        StakeStateV2::Stake(
            meta,
            Stake {
                delegation,
                credits_observed: 0,
            },
            StakeFlags::empty(),
        )
    }

    #[test]
    fn deactivating_stake_is_not_yet_withdrawable() {
        let authority = Pubkey::new_unique();
        let state = delegated(authority, 1_000, 10);

        let history = StakeHistory::default();

        let claim = claim_for_state(&state, 1_005, &authority, 9, &history).unwrap();
        assert_eq!(claim.withdrawable, 5);

        let claim = claim_for_state(&state, 1_005, &authority, 10, &history).unwrap();
        assert_eq!(claim.withdrawable, 5);

        // no cluster history for the deactivation epoch: fully cooled down
        let claim = claim_for_state(&state, 1_005, &authority, 11, &history).unwrap();
        assert_eq!(claim.withdrawable, 1_005);
    }

    #[test]
    fn cluster_cooldown_limits_what_is_withdrawable() {
        let authority = Pubkey::new_unique();
        let state = delegated(authority, 1_000, 10);

        // the whole cluster deactivates at once, so only a fraction cools down per epoch
        let mut history = StakeHistory::default();
        history.add(
            10,
            StakeHistoryEntry {
                effective: 10_000,
                activating: 0,
                deactivating: 10_000,
            },
        );

        let claim = claim_for_state(&state, 1_005, &authority, 11, &history).unwrap();
        assert!(claim.withdrawable > 5);
        assert!(claim.withdrawable < 1_005);
        assert!(!claim.is_cooled_down());
    }

    #[test]
    fn undelegated_stake_is_withdrawable() {
        let authority = Pubkey::new_unique();
        let state = StakeStateV2::Initialized(Meta {
            authorized: Authorized::auto(&authority),
            ..Meta::default()
        });

        let claim =
            claim_for_state(&state, 2_000, &authority, 3, &StakeHistory::default()).unwrap();
        assert_eq!(claim.lamports, 2_000);
        assert_eq!(claim.withdrawable, 2_000);
    }

    #[test]
    fn rejects_foreign_withdraw_authority() {
        let state = delegated(Pubkey::new_unique(), 1_000, 10);

        let history = StakeHistory::default();
        assert!(claim_for_state(&state, 1_000, &Pubkey::new_unique(), 11, &history).is_err());
        assert!(
            claim_for_state(&StakeStateV2::Uninitialized, 0, &Pubkey::new_unique(), 11, &history)
                .is_err()
        );
    }
}
