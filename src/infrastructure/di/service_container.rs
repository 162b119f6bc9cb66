//! Service container for dependency injection
//!
//! Wires up the case store and session with their dependencies.

use std::sync::Arc;

use crate::application::services::{CaseSession, CaseStore};
use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let settings = Arc::new(settings);

        Self { settings, fs }
    }

    /// Case store over the configured cases directory.
    pub fn case_store(&self) -> CaseStore {
        CaseStore::new(Arc::clone(&self.fs), self.settings.cases_dir.clone())
            .with_pretty(self.settings.pretty_json)
    }

    /// Fresh session without an active case.
    pub fn case_session(&self) -> CaseSession {
        CaseSession::new(self.case_store())
    }
}
