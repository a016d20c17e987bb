// sunrise_core/instructions/admin/mod.rs

pub mod export_mint_authority;
pub mod register_beam;
pub mod register_state;
pub mod remove_beam;
pub mod resize_allocations;
pub mod set_draining_mode;
pub mod update_allocations;
pub mod update_state;

pub use export_mint_authority::ExportMintAuthority;
pub(crate) use export_mint_authority::__client_accounts_export_mint_authority;
pub use register_beam::RegisterBeam;
pub(crate) use register_beam::__client_accounts_register_beam;
pub use register_state::RegisterState;
pub(crate) use register_state::__client_accounts_register_state;
pub use remove_beam::RemoveBeam;
pub(crate) use remove_beam::__client_accounts_remove_beam;
pub use resize_allocations::ResizeAllocations;
pub(crate) use resize_allocations::__client_accounts_resize_allocations;
pub use set_draining_mode::SetDrainingMode;
pub(crate) use set_draining_mode::__client_accounts_set_draining_mode;
pub use update_allocations::UpdateAllocations;
pub(crate) use update_allocations::__client_accounts_update_allocations;
pub use update_state::UpdateState;
pub(crate) use update_state::__client_accounts_update_state;

cfg_if::cfg_if! {
    if #[cfg(feature = "cpi")] {
        pub(crate) use export_mint_authority::__cpi_client_accounts_export_mint_authority;
        pub(crate) use register_beam::__cpi_client_accounts_register_beam;
        pub(crate) use register_state::__cpi_client_accounts_register_state;
        pub(crate) use remove_beam::__cpi_client_accounts_remove_beam;
        pub(crate) use resize_allocations::__cpi_client_accounts_resize_allocations;
        pub(crate) use set_draining_mode::__cpi_client_accounts_set_draining_mode;
        pub(crate) use update_allocations::__cpi_client_accounts_update_allocations;
        pub(crate) use update_state::__cpi_client_accounts_update_state;
    }
}
