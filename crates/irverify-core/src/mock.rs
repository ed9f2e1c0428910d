//! In-memory backend for testing the harness itself.
//!
//! Configurable behavior for exercising every verification outcome:
//! - Scripted per-module outcomes (pass, mutate, fail)
//! - Strictness flags honoured against per-module markers
//! - A shared call log recording verification order
//!
//! The parser accepts a `HloModule <name>` header followed by opaque body
//! lines. It is a stand-in, not an IR grammar.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use parking_lot::Mutex;

use crate::backend::{IrBackend, Verifier, VerifierOptions};
use crate::error::{CoreError, Result};
use crate::module::{IrModule, ModuleConfig, ModuleId};

/// Header keyword the mock parser expects on the first non-blank line.
pub const HEADER_KEYWORD: &str = "HloModule";

/// Module produced by [`MockBackend`].
#[derive(Debug, Clone)]
pub struct MockModule {
    id: ModuleId,
    name: String,
    config: ModuleConfig,
    /// Body lines, in order.
    pub body: Vec<String>,
    /// Marks the module as having a layout the verifier rejects when layout-sensitive.
    pub layout_mismatch: bool,
    /// Marks the module as mixing precisions.
    pub mixed_precision: bool,
}

impl MockModule {
    fn new(name: &str, config: &ModuleConfig) -> Self {
        Self {
            id: ModuleId::new(),
            name: name.to_string(),
            config: config.clone(),
            body: Vec::new(),
            layout_mismatch: false,
            mixed_precision: false,
        }
    }
}

impl IrModule for MockModule {
    fn id(&self) -> ModuleId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn config(&self) -> &ModuleConfig {
        &self.config
    }
}

/// Scripted verifier response for a module name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// Verification passes without touching the module.
    Pass,
    /// Verification rewrites the module and reports it.
    Mutate,
    /// Verification fails with the given detail.
    Fail(String),
}

/// One recorded verifier invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyCall {
    /// Module that was verified.
    pub module: ModuleId,
    /// Its name hint.
    pub name: String,
    /// Options the verifier was built with.
    pub options: VerifierOptions,
}

/// State shared between a backend and the verifiers it hands out.
#[derive(Default)]
struct MockState {
    outcomes: Mutex<HashMap<String, VerifyOutcome>>,
    calls: Mutex<Vec<VerifyCall>>,
    created_count: AtomicU32,
    parsed_count: AtomicU32,
}

/// Scriptable backend. Clones share state, so a test can keep one clone
/// for inspection after moving another into a harness.
#[derive(Clone, Default)]
pub struct MockBackend {
    state: Arc<MockState>,
}

impl MockBackend {
    /// Creates a backend where every module verifies cleanly.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the outcome for modules named `name`.
    #[must_use]
    pub fn with_outcome(self, name: impl Into<String>, outcome: VerifyOutcome) -> Self {
        self.set_outcome(name, outcome);
        self
    }

    /// Scripts the outcome for modules named `name` on a shared backend.
    pub fn set_outcome(&self, name: impl Into<String>, outcome: VerifyOutcome) {
        self.state.outcomes.lock().insert(name.into(), outcome);
    }

    /// Returns every verifier invocation so far, in call order.
    #[must_use]
    pub fn verify_calls(&self) -> Vec<VerifyCall> {
        self.state.calls.lock().clone()
    }

    /// Returns the names of verified modules, in call order.
    #[must_use]
    pub fn verified_names(&self) -> Vec<String> {
        self.state
            .calls
            .lock()
            .iter()
            .map(|call| call.name.clone())
            .collect()
    }

    /// Returns how many times `module` was verified.
    #[must_use]
    pub fn verify_count(&self, module: ModuleId) -> usize {
        self.state
            .calls
            .lock()
            .iter()
            .filter(|call| call.module == module)
            .count()
    }

    /// Number of modules produced by the factory.
    #[must_use]
    pub fn created_count(&self) -> u32 {
        self.state.created_count.load(Ordering::SeqCst)
    }

    /// Number of modules produced by the parser.
    #[must_use]
    pub fn parsed_count(&self) -> u32 {
        self.state.parsed_count.load(Ordering::SeqCst)
    }
}

impl IrBackend for MockBackend {
    type Module = MockModule;

    fn create_module(&self, name: &str, config: &ModuleConfig) -> MockModule {
        self.state.created_count.fetch_add(1, Ordering::SeqCst);
        MockModule::new(name, config)
    }

    fn parse_module(&self, text: &str, config: &ModuleConfig) -> Result<MockModule> {
        let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty());

        let header = lines
            .next()
            .ok_or_else(|| CoreError::parse("empty module text"))?;
        let rest = header
            .strip_prefix(HEADER_KEYWORD)
            .filter(|rest| rest.starts_with(char::is_whitespace))
            .ok_or_else(|| {
                CoreError::parse(format!("expected '{HEADER_KEYWORD} <name>', got '{header}'"))
            })?;
        let name = rest
            .split(|c: char| c.is_whitespace() || c == ',')
            .find(|token| !token.is_empty())
            .ok_or_else(|| CoreError::parse("module header is missing a name"))?;

        let mut module = MockModule::new(name, config);
        module.body = lines.map(str::to_string).collect();

        self.state.parsed_count.fetch_add(1, Ordering::SeqCst);
        Ok(module)
    }

    fn verifier(&self, options: VerifierOptions) -> Box<dyn Verifier<MockModule>> {
        Box::new(MockVerifier {
            state: Arc::clone(&self.state),
            options,
        })
    }
}

/// Verifier handed out by [`MockBackend`].
pub struct MockVerifier {
    state: Arc<MockState>,
    options: VerifierOptions,
}

impl Verifier<MockModule> for MockVerifier {
    fn name(&self) -> &str {
        "mock-verifier"
    }

    fn run(&self, module: &mut MockModule) -> Result<bool> {
        self.state.calls.lock().push(VerifyCall {
            module: module.id,
            name: module.name.clone(),
            options: self.options,
        });

        let scripted = self.state.outcomes.lock().get(&module.name).cloned();
        match scripted {
            Some(VerifyOutcome::Pass) => return Ok(false),
            Some(VerifyOutcome::Mutate) => {
                module.body.push("// canonicalized by verifier".to_string());
                return Ok(true);
            }
            Some(VerifyOutcome::Fail(detail)) => return Err(CoreError::verify(detail)),
            None => {}
        }

        if self.options.layout_sensitive && module.layout_mismatch {
            return Err(CoreError::verify(format!(
                "module '{}' has a layout mismatch",
                module.name
            )));
        }
        if !self.options.allow_mixed_precision && module.mixed_precision {
            return Err(CoreError::verify(format!(
                "module '{}' mixes floating-point precisions",
                module.name
            )));
        }

        Ok(false)
    }
}
