//! Service container for dependency injection
//!
//! Wires up services and inventory sources with their dependencies.

use std::path::Path;
use std::sync::Arc;

use crate::application::services::PlannerService;
use crate::config::Settings;
use crate::infrastructure::inventory::{AzureCliInventory, JsonFileInventory};
use crate::infrastructure::traits::{
    CommandRunner, FileSystem, RangeInventory, RealCommandRunner, RealFileSystem,
};

/// Container holding settings and I/O dependencies.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Command runner abstraction
    pub cmd: Arc<dyn CommandRunner>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(
            settings,
            Arc::new(RealFileSystem),
            Arc::new(RealCommandRunner),
        )
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        cmd: Arc<dyn CommandRunner>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self { settings, fs, cmd }
    }

    /// Planner using the configured subnet reservation.
    pub fn planner(&self) -> PlannerService {
        PlannerService::new(self.settings.reserved_addresses_per_subnet)
    }

    /// Inventory source: the JSON file if given, otherwise the Azure CLI.
    pub fn inventory(
        &self,
        existing: Option<&Path>,
        subscription: Option<&str>,
    ) -> Arc<dyn RangeInventory> {
        match existing {
            Some(path) => Arc::new(JsonFileInventory::new(self.fs.clone(), path)),
            None => Arc::new(AzureCliInventory::new(
                self.cmd.clone(),
                subscription.map(str::to_string),
            )),
        }
    }
}
