//! Collaborator contracts: module factory, parser and verifier.
//!
//! A compiler plugs into the harness by implementing [`IrBackend`]. The
//! verifier is handed out as a capability configured by [`VerifierOptions`]
//! rather than reached through an inherited accessor.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::module::{IrModule, ModuleConfig};

/// Strictness knobs for the structural verifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifierOptions {
    /// Whether layouts are part of what the verifier checks.
    #[serde(default)]
    pub layout_sensitive: bool,

    /// Whether operands of differing floating-point precision are accepted.
    #[serde(default)]
    pub allow_mixed_precision: bool,
}

impl VerifierOptions {
    /// Creates verifier options.
    #[must_use]
    pub const fn new(layout_sensitive: bool, allow_mixed_precision: bool) -> Self {
        Self {
            layout_sensitive,
            allow_mixed_precision,
        }
    }
}

/// Structural verifier for IR modules.
///
/// `run` returns `Ok(true)` if it changed the module. A correct verifier
/// never does that on a well-formed module.
pub trait Verifier<M: IrModule> {
    /// Verifier name, used in log output.
    fn name(&self) -> &str;

    /// Verifies a module.
    ///
    /// # Errors
    /// Returns an error describing the first structural problem found.
    fn run(&self, module: &mut M) -> Result<bool>;
}

/// Everything the harness needs from a compiler.
pub trait IrBackend {
    /// The module type this backend produces.
    type Module: IrModule + 'static;

    /// Creates a fresh, empty, valid module.
    fn create_module(&self, name: &str, config: &ModuleConfig) -> Self::Module;

    /// Parses the textual form of a module.
    ///
    /// # Errors
    /// Returns a parse error if `text` is not a valid module.
    fn parse_module(&self, text: &str, config: &ModuleConfig) -> Result<Self::Module>;

    /// Builds a verifier with the given strictness.
    fn verifier(&self, options: VerifierOptions) -> Box<dyn Verifier<Self::Module>>;
}
