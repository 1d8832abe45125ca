//! Kernel services shared by the shell and its feature crates.
//! Keep this crate lightweight: configuration loading, the persisted settings
//! store, the write-once type registry and filesystem hardening.
//!
//! ## Config loading
//! ```rust,no_run
//! use aegis_kernel::config::load_config;
//! use aegis_kernel::domain::config::ClientConfig;
//!
//! let cfg: ClientConfig = load_config(None::<&str>).unwrap_or_default();
//! ```

pub mod config;
pub mod registry;
pub mod security;
pub mod settings;

pub use aegis_domain as domain;
