// sunrise_core/instructions/beam/mod.rs

pub mod burn_gsol;
pub mod extract_yield;
pub mod mint_gsol;
pub mod transfer_gsol;
pub mod update_epoch_report;

pub use burn_gsol::BurnGsol;
pub(crate) use burn_gsol::__client_accounts_burn_gsol;
pub use extract_yield::ExtractYield;
pub(crate) use extract_yield::__client_accounts_extract_yield;
pub use mint_gsol::MintGsol;
pub(crate) use mint_gsol::__client_accounts_mint_gsol;
pub use transfer_gsol::TransferGsol;
pub(crate) use transfer_gsol::__client_accounts_transfer_gsol;
pub use update_epoch_report::UpdateEpochReport;
pub(crate) use update_epoch_report::__client_accounts_update_epoch_report;

cfg_if::cfg_if! {
    if #[cfg(feature = "cpi")] {
        pub(crate) use burn_gsol::__cpi_client_accounts_burn_gsol;
        pub(crate) use extract_yield::__cpi_client_accounts_extract_yield;
        pub(crate) use mint_gsol::__cpi_client_accounts_mint_gsol;
        pub(crate) use transfer_gsol::__cpi_client_accounts_transfer_gsol;
        pub(crate) use update_epoch_report::__cpi_client_accounts_update_epoch_report;
    }
}
