// spl_beam/instructions/crank/mod.rs

pub mod extract_yield;
pub mod update_epoch_report;

pub use extract_yield::ExtractYield;
pub(crate) use extract_yield::__client_accounts_extract_yield;
pub use update_epoch_report::UpdateEpochReport;
pub(crate) use update_epoch_report::__client_accounts_update_epoch_report;

cfg_if::cfg_if! {
    if #[cfg(feature = "cpi")] {
        pub(crate) use extract_yield::__cpi_client_accounts_extract_yield;
        pub(crate) use update_epoch_report::__cpi_client_accounts_update_epoch_report;
    }
}
