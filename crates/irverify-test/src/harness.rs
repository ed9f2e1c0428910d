//! Auto-verifying test harness for IR modules.
//!
//! Every module a test touches through the harness is verified exactly once
//! at teardown, primary module first, then additional modules in creation
//! order. Verifier rejections and unexpected mutations are recorded in the
//! [`FailureLog`]; they never abort the test on the spot.
//!
//! Lifecycle:
//! ```text
//! Active ──teardown()──▶ TornDown ──teardown()──▶ TornDown (+1 DoubleTeardown failure)
//!   │
//!   └──drop──▶ panic (teardown was never called)
//! ```

use irverify_core::{
    HarnessConfig, IrBackend, IrModule, ModuleConfig, ModuleId, Verifier, VerifierOptions,
};

use crate::error::{HarnessError, Result};
use crate::failure::{FailureKind, FailureLog, ModuleRef, TestFailure, VerificationPhase};
use crate::registry::{ModuleEntry, ModuleRegistry};

/// Harness lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarnessState {
    /// Test body is running.
    Active,
    /// Teardown verification has run.
    TornDown,
}

type TeardownHook = Box<dyn FnOnce()>;

/// Test harness that owns IR modules and verifies them at teardown.
pub struct VerifyingTestHarness<B: IrBackend> {
    backend: B,
    verifier: Box<dyn Verifier<B::Module>>,
    options: VerifierOptions,
    module_config: ModuleConfig,
    default_module_name: String,
    registry: ModuleRegistry<B::Module>,
    failures: FailureLog,
    state: HarnessState,
    teardown_hooks: Vec<TeardownHook>,
}

impl<B: IrBackend> VerifyingTestHarness<B> {
    /// Creates a harness whose verifier uses the given strictness.
    #[must_use]
    pub fn new(backend: B, layout_sensitive: bool, allow_mixed_precision: bool) -> Self {
        Self::with_options(
            backend,
            VerifierOptions::new(layout_sensitive, allow_mixed_precision),
        )
    }

    /// Creates a harness from verifier options.
    #[must_use]
    pub fn with_options(backend: B, options: VerifierOptions) -> Self {
        Self::builder(backend).with_options(options).build()
    }

    /// Creates a harness from a loaded configuration.
    #[must_use]
    pub fn from_config(backend: B, config: &HarnessConfig) -> Self {
        Self::builder(backend).with_config(config).build()
    }

    /// Creates a new harness builder.
    #[must_use]
    pub fn builder(backend: B) -> VerifyingTestHarnessBuilder<B> {
        VerifyingTestHarnessBuilder::new(backend)
    }

    /// Returns the primary module, creating it on first access.
    ///
    /// Repeated calls return the same module.
    pub fn primary(&mut self) -> &mut B::Module {
        if !self.registry.has_primary() {
            self.warn_if_torn_down(&self.default_module_name);
        }
        let Self {
            backend,
            registry,
            module_config,
            default_module_name,
            ..
        } = self;
        registry.primary_or_insert_with(|| {
            let module = backend.create_module(default_module_name.as_str(), module_config);
            tracing::debug!(module = %module.name(), id = %module.id(), "created primary module");
            module
        })
    }

    /// Returns true if the primary module exists.
    #[must_use]
    pub fn has_primary(&self) -> bool {
        self.registry.has_primary()
    }

    /// Creates an additional module owned by the harness.
    ///
    /// The name hint is kept on the module and shows up in failure reports.
    pub fn create_module(&mut self, name: &str) -> &mut B::Module {
        self.warn_if_torn_down(name);
        let module = self.backend.create_module(name, &self.module_config);
        tracing::debug!(module = %module.name(), id = %module.id(), "created module");
        self.registry.push_additional(module)
    }

    /// Creates an additional module named after the configured default name.
    pub fn create_default_module(&mut self) -> &mut B::Module {
        let name = self.default_module_name.clone();
        self.create_module(&name)
    }

    /// Parses `text` into the primary module and verifies it right away.
    ///
    /// The module is verified again at teardown.
    ///
    /// # Panics
    /// Panics if a primary module already exists or if `text` fails to parse.
    #[track_caller]
    #[allow(clippy::panic)] // Misuse and unparseable input stop the test at the call site.
    pub fn parse_and_verify_module(&mut self, text: &str, config: &ModuleConfig) {
        if let Err(e) = self.try_parse_and_verify_module(text, config) {
            tracing::error!(error = %e, "parse_and_verify_module failed");
            panic!("{e}");
        }
    }

    /// [`Self::parse_and_verify_module`] with a default module config.
    ///
    /// # Panics
    /// Panics if a primary module already exists or if `text` fails to parse.
    #[track_caller]
    pub fn parse_and_verify_module_default(&mut self, text: &str) {
        self.parse_and_verify_module(text, &ModuleConfig::default());
    }

    /// Fallible form of [`Self::parse_and_verify_module`].
    ///
    /// Verification failures are recorded in the failure log, not returned.
    ///
    /// # Errors
    /// Returns [`HarnessError::SecondPrimaryModule`] if a primary module
    /// already exists, or [`HarnessError::Parse`] if parsing fails.
    pub fn try_parse_and_verify_module(&mut self, text: &str, config: &ModuleConfig) -> Result<()> {
        if let Some(existing) = self.registry.primary() {
            return Err(HarnessError::SecondPrimaryModule {
                existing: existing.name().to_string(),
            });
        }

        let module = self
            .backend
            .parse_module(text, config)
            .map_err(HarnessError::Parse)?;
        tracing::debug!(module = %module.name(), id = %module.id(), "parsed primary module");

        let module = self.registry.primary_or_insert_with(|| module);
        verify_module(
            self.verifier.as_ref(),
            module,
            VerificationPhase::Immediate,
            &mut self.failures,
        );
        Ok(())
    }

    /// Verifies one owned module now, in addition to teardown verification.
    ///
    /// # Errors
    /// Returns [`HarnessError::UnknownModule`] if the harness does not own `id`.
    pub fn verify_module_now(&mut self, id: ModuleId) -> Result<()> {
        let module = self
            .registry
            .get_mut(id)
            .ok_or(HarnessError::UnknownModule(id))?;
        verify_module(
            self.verifier.as_ref(),
            module,
            VerificationPhase::OnDemand,
            &mut self.failures,
        );
        Ok(())
    }

    /// Registers a callback to run after teardown verification.
    ///
    /// Hooks run once, in registration order, on the first teardown only.
    pub fn on_teardown(&mut self, hook: impl FnOnce() + 'static) {
        self.teardown_hooks.push(Box::new(hook));
    }

    /// Verifies every owned module and finishes the test case.
    ///
    /// A second call records a double-teardown failure and verifies nothing.
    pub fn teardown(&mut self) -> &FailureLog {
        if self.state == HarnessState::TornDown {
            self.failures.record(TestFailure {
                kind: FailureKind::DoubleTeardown,
                module: None,
                phase: VerificationPhase::Teardown,
            });
            return &self.failures;
        }
        self.state = HarnessState::TornDown;

        tracing::info!(
            modules = self.registry.len(),
            primary = self.registry.has_primary(),
            verifier = self.verifier.name(),
            "verifying modules at teardown"
        );
        let before = self.failures.len();
        for ModuleEntry { module, .. } in self.registry.iter_mut() {
            verify_module(
                self.verifier.as_ref(),
                module,
                VerificationPhase::Teardown,
                &mut self.failures,
            );
        }

        for hook in self.teardown_hooks.drain(..) {
            hook();
        }

        tracing::info!(
            new_failures = self.failures.len() - before,
            total_failures = self.failures.len(),
            "teardown complete"
        );
        &self.failures
    }

    /// Looks up an owned module by id.
    #[must_use]
    pub fn module(&self, id: ModuleId) -> Option<&B::Module> {
        self.registry.get(id)
    }

    /// Looks up an owned module by id, mutably.
    pub fn module_mut(&mut self, id: ModuleId) -> Option<&mut B::Module> {
        self.registry.get_mut(id)
    }

    /// Iterates owned modules in verification order.
    pub fn modules(&self) -> impl Iterator<Item = &B::Module> {
        self.registry.iter().map(|entry| &entry.module)
    }

    /// Number of owned modules, primary included.
    #[must_use]
    pub fn module_count(&self) -> usize {
        self.registry.len()
    }

    /// Verifier strictness.
    #[must_use]
    pub const fn options(&self) -> VerifierOptions {
        self.options
    }

    /// Lifecycle state.
    #[must_use]
    pub const fn state(&self) -> HarnessState {
        self.state
    }

    /// Returns true once teardown has run.
    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.state == HarnessState::TornDown
    }

    /// Failures recorded so far.
    #[must_use]
    pub const fn failures(&self) -> &FailureLog {
        &self.failures
    }

    /// The backend modules are created with.
    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    fn warn_if_torn_down(&self, name: &str) {
        if self.state == HarnessState::TornDown {
            tracing::warn!(module = %name, "module created after teardown will not be verified");
        }
    }
}

impl<B: IrBackend> Drop for VerifyingTestHarness<B> {
    #[allow(clippy::panic)] // Catches fixtures whose teardown does not chain to the harness.
    fn drop(&mut self) {
        if self.state == HarnessState::TornDown {
            return;
        }
        let err = HarnessError::TeardownNeverCalled;
        if std::thread::panicking() {
            // A second panic would abort and hide the original test failure.
            tracing::error!(error = %err, "harness dropped during unwinding");
            return;
        }
        tracing::error!(error = %err, modules = self.registry.len(), "harness dropped while active");
        panic!("{err}");
    }
}

/// Runs the verifier on one module and records the outcome.
fn verify_module<M: IrModule>(
    verifier: &dyn Verifier<M>,
    module: &mut M,
    phase: VerificationPhase,
    failures: &mut FailureLog,
) {
    let kind = match verifier.run(module) {
        Ok(false) => {
            tracing::trace!(module = %module.name(), %phase, "module verified");
            return;
        }
        Ok(true) => FailureKind::UnexpectedMutation,
        Err(e) => FailureKind::Verification {
            detail: e.to_string(),
        },
    };
    failures.record(TestFailure {
        kind,
        module: Some(ModuleRef {
            id: module.id(),
            name: module.name().to_string(),
        }),
        phase,
    });
}

/// Builder for [`VerifyingTestHarness`].
pub struct VerifyingTestHarnessBuilder<B: IrBackend> {
    backend: B,
    options: VerifierOptions,
    module_config: ModuleConfig,
    default_module_name: Option<String>,
}

impl<B: IrBackend> VerifyingTestHarnessBuilder<B> {
    fn new(backend: B) -> Self {
        Self {
            backend,
            options: VerifierOptions::default(),
            module_config: ModuleConfig::default(),
            default_module_name: None,
        }
    }

    /// Sets verifier strictness.
    #[must_use]
    pub const fn with_options(mut self, options: VerifierOptions) -> Self {
        self.options = options;
        self
    }

    /// Makes the verifier check layouts.
    #[must_use]
    pub const fn with_layout_sensitive(mut self, layout_sensitive: bool) -> Self {
        self.options.layout_sensitive = layout_sensitive;
        self
    }

    /// Lets the verifier accept mixed floating-point precision.
    #[must_use]
    pub const fn with_mixed_precision(mut self, allow_mixed_precision: bool) -> Self {
        self.options.allow_mixed_precision = allow_mixed_precision;
        self
    }

    /// Sets the config used for factory-created modules.
    #[must_use]
    pub fn with_module_config(mut self, config: ModuleConfig) -> Self {
        self.module_config = config;
        self
    }

    /// Sets the name for the primary and default modules.
    #[must_use]
    pub fn with_default_module_name(mut self, name: impl Into<String>) -> Self {
        self.default_module_name = Some(name.into());
        self
    }

    /// Applies every setting from a loaded configuration.
    #[must_use]
    pub fn with_config(self, config: &HarnessConfig) -> Self {
        self.with_options(config.verifier)
            .with_module_config(config.module.clone())
            .with_default_module_name(config.default_module_name.clone())
    }

    /// Builds the harness.
    #[must_use]
    pub fn build(self) -> VerifyingTestHarness<B> {
        let default_module_name = self
            .default_module_name
            .unwrap_or_else(|| HarnessConfig::default().default_module_name);
        let verifier = self.backend.verifier(self.options);

        VerifyingTestHarness {
            backend: self.backend,
            verifier,
            options: self.options,
            module_config: self.module_config,
            default_module_name,
            registry: ModuleRegistry::new(),
            failures: FailureLog::new(),
            state: HarnessState::Active,
            teardown_hooks: Vec::new(),
        }
    }
}
