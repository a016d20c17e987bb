// spl_beam/instructions/admin/mod.rs

pub mod initialize;
pub mod update;

pub use initialize::Initialize;
pub(crate) use initialize::__client_accounts_initialize;
pub use update::Update;
pub(crate) use update::__client_accounts_update;

cfg_if::cfg_if! {
    if #[cfg(feature = "cpi")] {
        pub(crate) use initialize::__cpi_client_accounts_initialize;
        pub(crate) use update::__cpi_client_accounts_update;
    }
}
