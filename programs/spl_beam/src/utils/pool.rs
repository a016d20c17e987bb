// spl_beam/utils/pool.rs

// external dependencies
use anchor_lang::{
    prelude::*,
    solana_program::program::{invoke, invoke_signed},
};
use spl_stake_pool::state::Fee;
use std::ops::Deref;

// local dependencies
use crate::{constants::SPL_STAKE_POOL_PROGRAM, errors::SplBeamError};

#[derive(Clone)]
pub struct SplStakePool;

impl anchor_lang::Id for SplStakePool {
    fn id() -> Pubkey {
        SPL_STAKE_POOL_PROGRAM
    }
}

/// Read-only view of an SPL stake pool account.
#[derive(Clone, Debug, PartialEq)]
pub struct StakePool(spl_stake_pool::state::StakePool);

impl anchor_lang::AccountDeserialize for StakePool {
    fn try_deserialize_unchecked(buf: &mut &[u8]) -> anchor_lang::Result<Self> {
        let stake_pool = <spl_stake_pool::state::StakePool as AnchorDeserialize>::deserialize(buf)
            .map_err(|_| ErrorCode::AccountDidNotDeserialize)?;
        Ok(StakePool(stake_pool))
    }
}

impl anchor_lang::AccountSerialize for StakePool {}

impl anchor_lang::Owner for StakePool {
    fn owner() -> Pubkey {
        SPL_STAKE_POOL_PROGRAM
    }
}

impl Deref for StakePool {
    type Target = spl_stake_pool::state::StakePool;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// amount * numerator / denominator, the share price conversion in either direction
pub fn proportional(amount: u64, numerator: u64, denominator: u64) -> Result<u64> {
    if denominator == 0 {
        return Ok(amount);
    }
    u64::try_from(u128::from(amount) * u128::from(numerator) / u128::from(denominator))
        .map_err(|_| error!(SplBeamError::CalculationFailure))
}

pub fn pool_tokens_from_lamports(stake_pool: &StakePool, lamports: u64) -> Result<u64> {
    proportional(lamports, stake_pool.pool_token_supply, stake_pool.total_lamports)
}

pub fn lamports_from_pool_tokens(stake_pool: &StakePool, pool_tokens: u64) -> Result<u64> {
    proportional(pool_tokens, stake_pool.total_lamports, stake_pool.pool_token_supply)
}

pub fn fee_amount(fee: &Fee, amount: u64) -> Result<u64> {
    // an unset fee is 0/0
    if fee.denominator == 0 {
        return Ok(0);
    }
    proportional(amount, fee.numerator, fee.denominator)
}

/// Value of the vault's pool tokens above the gSOL this beam has minted.
pub fn extractable_yield(
    stake_pool: &StakePool,
    vault_pool_tokens: u64,
    partial_gsol_supply: u64,
) -> Result<u64> {
    let staked_value = lamports_from_pool_tokens(stake_pool, vault_pool_tokens)?;
    Ok(staked_value.saturating_sub(partial_gsol_supply))
}

pub struct DepositSolAccounts<'a, 'info> {
    pub stake_pool_program: &'a AccountInfo<'info>,
    pub stake_pool: &'a AccountInfo<'info>,
    pub stake_pool_withdraw_authority: &'a AccountInfo<'info>,
    pub reserve_stake_account: &'a AccountInfo<'info>,
    pub depositor: &'a AccountInfo<'info>,
    pub pool_token_vault: &'a AccountInfo<'info>,
    pub manager_fee_account: &'a AccountInfo<'info>,
    pub pool_mint: &'a AccountInfo<'info>,
    pub system_program: &'a AccountInfo<'info>,
    pub token_program: &'a AccountInfo<'info>,
}

pub fn deposit_sol(accounts: DepositSolAccounts, lamports: u64) -> Result<()> {
    invoke(
        &spl_stake_pool::instruction::deposit_sol(
            &SPL_STAKE_POOL_PROGRAM,
            accounts.stake_pool.key,
            accounts.stake_pool_withdraw_authority.key,
            accounts.reserve_stake_account.key,
            accounts.depositor.key,
            accounts.pool_token_vault.key,
            accounts.manager_fee_account.key,
            accounts.pool_token_vault.key, // referrer
            accounts.pool_mint.key,
            accounts.token_program.key,
            lamports,
        ),
        &[
            accounts.stake_pool_program.clone(),
            accounts.stake_pool.clone(),
            accounts.stake_pool_withdraw_authority.clone(),
            accounts.reserve_stake_account.clone(),
            accounts.depositor.clone(),
            accounts.pool_token_vault.clone(),
            accounts.manager_fee_account.clone(),
            accounts.pool_mint.clone(),
            accounts.system_program.clone(),
            accounts.token_program.clone(),
        ],
    )?;

    Ok(())
}

pub struct DepositStakeAccounts<'a, 'info> {
    pub stake_pool_program: &'a AccountInfo<'info>,
    pub stake_pool: &'a AccountInfo<'info>,
    pub validator_list: &'a AccountInfo<'info>,
    pub stake_pool_deposit_authority: &'a AccountInfo<'info>,
    pub stake_pool_withdraw_authority: &'a AccountInfo<'info>,
    pub stake_account: &'a AccountInfo<'info>,
    pub stake_owner: &'a AccountInfo<'info>,
    pub validator_stake_account: &'a AccountInfo<'info>,
    pub reserve_stake_account: &'a AccountInfo<'info>,
    pub pool_token_vault: &'a AccountInfo<'info>,
    pub manager_fee_account: &'a AccountInfo<'info>,
    pub pool_mint: &'a AccountInfo<'info>,
    pub clock: &'a AccountInfo<'info>,
    pub stake_history: &'a AccountInfo<'info>,
    pub token_program: &'a AccountInfo<'info>,
    pub native_stake_program: &'a AccountInfo<'info>,
}

pub fn deposit_stake(accounts: DepositStakeAccounts) -> Result<()> {
    // authorize staker, authorize withdrawer, then the deposit itself
    let instructions = spl_stake_pool::instruction::deposit_stake(
        &SPL_STAKE_POOL_PROGRAM,
        accounts.stake_pool.key,
        accounts.validator_list.key,
        accounts.stake_pool_withdraw_authority.key,
        accounts.stake_account.key,
        accounts.stake_owner.key,
        accounts.validator_stake_account.key,
        accounts.reserve_stake_account.key,
        accounts.pool_token_vault.key,
        accounts.manager_fee_account.key,
        accounts.pool_token_vault.key, // referrer
        accounts.pool_mint.key,
        accounts.token_program.key,
    );

    let authorize_accounts = [
        accounts.native_stake_program.clone(),
        accounts.stake_account.clone(),
        accounts.clock.clone(),
        accounts.stake_owner.clone(),
        accounts.stake_pool_deposit_authority.clone(),
        accounts.stake_pool_withdraw_authority.clone(),
    ];

    for (i, ix) in instructions.iter().enumerate() {
        if i + 1 < instructions.len() {
            invoke(ix, &authorize_accounts)?;
            continue;
        }
        invoke(
            ix,
            &[
                accounts.stake_pool_program.clone(),
                accounts.stake_pool.clone(),
                accounts.validator_list.clone(),
                accounts.stake_pool_deposit_authority.clone(),
                accounts.stake_pool_withdraw_authority.clone(),
                accounts.stake_account.clone(),
                accounts.validator_stake_account.clone(),
                accounts.reserve_stake_account.clone(),
                accounts.manager_fee_account.clone(),
                accounts.pool_token_vault.clone(),
                accounts.pool_mint.clone(),
                accounts.clock.clone(),
                accounts.stake_history.clone(),
                accounts.token_program.clone(),
                accounts.native_stake_program.clone(),
            ],
        )?;
    }

    Ok(())
}

pub struct WithdrawSolAccounts<'a, 'info> {
    pub stake_pool_program: &'a AccountInfo<'info>,
    pub stake_pool: &'a AccountInfo<'info>,
    pub stake_pool_withdraw_authority: &'a AccountInfo<'info>,
    pub vault_authority: &'a AccountInfo<'info>,
    pub pool_token_vault: &'a AccountInfo<'info>,
    pub reserve_stake_account: &'a AccountInfo<'info>,
    pub lamports_to: &'a AccountInfo<'info>,
    pub manager_fee_account: &'a AccountInfo<'info>,
    pub pool_mint: &'a AccountInfo<'info>,
    pub clock: &'a AccountInfo<'info>,
    pub stake_history: &'a AccountInfo<'info>,
    pub native_stake_program: &'a AccountInfo<'info>,
    pub token_program: &'a AccountInfo<'info>,
}

pub fn withdraw_sol(
    accounts: WithdrawSolAccounts,
    pool_tokens: u64,
    vault_authority_seeds: &[&[&[u8]]],
) -> Result<()> {
    invoke_signed(
        &spl_stake_pool::instruction::withdraw_sol(
            &SPL_STAKE_POOL_PROGRAM,
            accounts.stake_pool.key,
            accounts.stake_pool_withdraw_authority.key,
            accounts.vault_authority.key,
            accounts.pool_token_vault.key,
            accounts.reserve_stake_account.key,
            accounts.lamports_to.key,
            accounts.manager_fee_account.key,
            accounts.pool_mint.key,
            accounts.token_program.key,
            pool_tokens,
        ),
        &[
            accounts.stake_pool_program.clone(),
            accounts.stake_pool.clone(),
            accounts.stake_pool_withdraw_authority.clone(),
            accounts.vault_authority.clone(),
            accounts.pool_token_vault.clone(),
            accounts.reserve_stake_account.clone(),
            accounts.lamports_to.clone(),
            accounts.manager_fee_account.clone(),
            accounts.pool_mint.clone(),
            accounts.clock.clone(),
            accounts.stake_history.clone(),
            accounts.native_stake_program.clone(),
            accounts.token_program.clone(),
        ],
        vault_authority_seeds,
    )?;

    Ok(())
}

pub struct WithdrawStakeAccounts<'a, 'info> {
    pub stake_pool_program: &'a AccountInfo<'info>,
    pub stake_pool: &'a AccountInfo<'info>,
    pub validator_list: &'a AccountInfo<'info>,
    pub stake_pool_withdraw_authority: &'a AccountInfo<'info>,
    pub stake_account_to_split: &'a AccountInfo<'info>,
    pub new_stake_account: &'a AccountInfo<'info>,
    pub new_stake_authority: &'a AccountInfo<'info>,
    pub vault_authority: &'a AccountInfo<'info>,
    pub pool_token_vault: &'a AccountInfo<'info>,
    pub manager_fee_account: &'a AccountInfo<'info>,
    pub pool_mint: &'a AccountInfo<'info>,
    pub clock: &'a AccountInfo<'info>,
    pub token_program: &'a AccountInfo<'info>,
    pub native_stake_program: &'a AccountInfo<'info>,
}

/// Splits `pool_tokens` worth of stake out of the pool into `new_stake_account`,
/// staked and withdrawable by `new_stake_authority`.
pub fn withdraw_stake(
    accounts: WithdrawStakeAccounts,
    pool_tokens: u64,
    vault_authority_seeds: &[&[&[u8]]],
) -> Result<()> {
    invoke_signed(
        &spl_stake_pool::instruction::withdraw_stake(
            &SPL_STAKE_POOL_PROGRAM,
            accounts.stake_pool.key,
            accounts.validator_list.key,
            accounts.stake_pool_withdraw_authority.key,
            accounts.stake_account_to_split.key,
            accounts.new_stake_account.key,
            accounts.new_stake_authority.key,
            accounts.vault_authority.key,
            accounts.pool_token_vault.key,
            accounts.manager_fee_account.key,
            accounts.pool_mint.key,
            accounts.token_program.key,
            pool_tokens,
        ),
        &[
            accounts.stake_pool_program.clone(),
            accounts.stake_pool.clone(),
            accounts.validator_list.clone(),
            accounts.stake_pool_withdraw_authority.clone(),
            accounts.stake_account_to_split.clone(),
            accounts.new_stake_account.clone(),
            accounts.new_stake_authority.clone(),
            accounts.vault_authority.clone(),
            accounts.pool_token_vault.clone(),
            accounts.manager_fee_account.clone(),
            accounts.pool_mint.clone(),
            accounts.clock.clone(),
            accounts.token_program.clone(),
            accounts.native_stake_program.clone(),
        ],
        vault_authority_seeds,
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(total_lamports: u64, pool_token_supply: u64) -> StakePool {
        StakePool(spl_stake_pool::state::StakePool {
            total_lamports,
            pool_token_supply,
            ..Default::default()
        })
    }

    #[test]
    fn proportional_handles_empty_denominator() {
        assert_eq!(proportional(500, 3, 0).unwrap(), 500);
        assert_eq!(proportional(500, 3, 4).unwrap(), 375);
    }

    #[test]
    fn proportional_does_not_overflow_in_the_intermediate() {
        assert_eq!(proportional(u64::MAX, u64::MAX, u64::MAX).unwrap(), u64::MAX);
        assert!(proportional(u64::MAX, 2, 1).is_err());
    }

    #[test]
    fn converts_between_lamports_and_pool_tokens() {
        // 1 pool token is worth 1.25 SOL
        let pool = pool(1_250_000, 1_000_000);

        assert_eq!(pool_tokens_from_lamports(&pool, 125).unwrap(), 100);
        assert_eq!(lamports_from_pool_tokens(&pool, 100).unwrap(), 125);
    }

    #[test]
    fn yield_is_the_value_above_minted_supply() {
        let pool = pool(1_100, 1_000);

        // 1_000 pool tokens are worth 1_100 lamports, 1_000 gSOL were minted against them
        assert_eq!(extractable_yield(&pool, 1_000, 1_000).unwrap(), 100);
        // a slashed pool has nothing to extract
        assert_eq!(extractable_yield(&pool, 800, 1_000).unwrap(), 0);
    }

    #[test]
    fn fee_is_proportional() {
        let fee = Fee {
            numerator: 3,
            denominator: 1_000,
        };
        assert_eq!(fee_amount(&fee, 10_000).unwrap(), 30);
        assert_eq!(fee_amount(&Fee::default(), 10_000).unwrap(), 0);
    }
}
