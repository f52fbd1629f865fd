//! Startup plumbing shared by candor entry points. For now that is settings loading.
//!
//! ```rust,no_run
//! use candor_kernel::config::load_core_config;
//!
//! let cfg = load_core_config(Some("candor.toml")).unwrap();
//! assert!(cfg.vault.iterations > 0);
//! ```
pub mod config;

pub use candor_domain as domain;
