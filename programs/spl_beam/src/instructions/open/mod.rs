// spl_beam/instructions/open/mod.rs

pub mod burn;
pub mod deposit;
pub mod deposit_stake;
pub mod order_withdrawal;
pub mod redeem_ticket;
pub mod withdraw;
pub mod withdraw_stake;

pub use burn::Burn;
pub(crate) use burn::__client_accounts_burn;
pub use deposit::Deposit;
pub(crate) use deposit::__client_accounts_deposit;
pub use deposit_stake::DepositStake;
pub(crate) use deposit_stake::__client_accounts_deposit_stake;
pub use order_withdrawal::OrderWithdrawal;
pub(crate) use order_withdrawal::__client_accounts_order_withdrawal;
pub use redeem_ticket::RedeemTicket;
pub(crate) use redeem_ticket::__client_accounts_redeem_ticket;
pub use withdraw::Withdraw;
pub(crate) use withdraw::__client_accounts_withdraw;
pub use withdraw_stake::WithdrawStake;
pub(crate) use withdraw_stake::__client_accounts_withdraw_stake;

cfg_if::cfg_if! {
    if #[cfg(feature = "cpi")] {
        pub(crate) use burn::__cpi_client_accounts_burn;
        pub(crate) use deposit::__cpi_client_accounts_deposit;
        pub(crate) use deposit_stake::__cpi_client_accounts_deposit_stake;
        pub(crate) use order_withdrawal::__cpi_client_accounts_order_withdrawal;
        pub(crate) use redeem_ticket::__cpi_client_accounts_redeem_ticket;
        pub(crate) use withdraw::__cpi_client_accounts_withdraw;
        pub(crate) use withdraw_stake::__cpi_client_accounts_withdraw_stake;
    }
}
