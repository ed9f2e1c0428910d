//! Opaque IR module types.
//!
//! The harness never looks inside a module. It only needs a stable identity
//! and the name hint it was created with, for diagnostics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Unique identifier for an IR module instance.
///
/// UUIDs rather than registry indices, so an id stays meaningful in a
/// failure report after the harness that owned the module is gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModuleId(uuid::Uuid);

impl ModuleId {
    /// Creates a new random module ID.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Creates a module ID from a UUID.
    #[must_use]
    pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl Default for ModuleId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ModuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An intermediate-representation module under test.
///
/// Implemented by whatever compiler the harness is plugged into.
pub trait IrModule {
    /// Stable identity of this module instance.
    fn id(&self) -> ModuleId;

    /// Name the module was created or parsed with.
    fn name(&self) -> &str;

    /// Configuration the module was built against.
    fn config(&self) -> &ModuleConfig;
}

/// Per-module compilation configuration handed to the factory and parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleConfig {
    /// Number of replicas the module is compiled for.
    #[serde(default = "default_replica_count")]
    pub replica_count: u32,

    /// Number of partitions the module is compiled for.
    #[serde(default = "default_num_partitions")]
    pub num_partitions: u32,

    /// Seed for any randomized lowering.
    #[serde(default)]
    pub seed: u64,

    /// Free-form debug flags forwarded to the backend untouched.
    #[serde(default)]
    pub debug_options: BTreeMap<String, String>,
}

fn default_replica_count() -> u32 {
    1
}

fn default_num_partitions() -> u32 {
    1
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            replica_count: default_replica_count(),
            num_partitions: default_num_partitions(),
            seed: 0,
            debug_options: BTreeMap::new(),
        }
    }
}

impl ModuleConfig {
    /// Sets the replica count.
    #[must_use]
    pub const fn with_replica_count(mut self, replica_count: u32) -> Self {
        self.replica_count = replica_count;
        self
    }

    /// Sets a debug option.
    #[must_use]
    pub fn with_debug_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.debug_options.insert(key.into(), value.into());
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns an error if replica or partition counts are zero.
    pub fn validate(&self) -> Result<()> {
        if self.replica_count == 0 {
            return Err(CoreError::config("replica_count must be greater than 0"));
        }
        if self.num_partitions == 0 {
            return Err(CoreError::config("num_partitions must be greater than 0"));
        }
        Ok(())
    }
}
