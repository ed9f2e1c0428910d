// Allow unwrap/expect in tests for clear failure messages
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

//! # irverify-core
//!
//! Contracts between the irverify test harness and the compiler it tests.
//!
//! - [`IrModule`] for the opaque module under test
//! - [`IrBackend`] bundling the module factory, parser and verifier factory
//! - [`Verifier`] for structural verification (`Ok(true)` means "mutated")
//! - [`HarnessConfig`] for TOML-loadable harness settings
//! - [`mock`] for a scriptable in-memory backend
//!
//! ## Example
//!
//! ```rust
//! use irverify_core::mock::MockBackend;
//! use irverify_core::{IrBackend, IrModule, ModuleConfig, Verifier, VerifierOptions};
//!
//! let backend = MockBackend::new();
//! let mut module = backend.create_module("m0", &ModuleConfig::default());
//! let verifier = backend.verifier(VerifierOptions::default());
//! assert_eq!(verifier.run(&mut module).ok(), Some(false));
//! assert_eq!(module.name(), "m0");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod backend;
pub mod config;
pub mod error;
pub mod mock;
pub mod module;

pub use backend::{IrBackend, Verifier, VerifierOptions};
pub use config::HarnessConfig;
pub use error::{CoreError, Result};
pub use module::{IrModule, ModuleConfig, ModuleId};
