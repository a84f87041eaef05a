// Copyright 2025 Cowboy AI, LLC.

//! Configuration for reading and writing archives

use std::sync::Arc;

use crate::archive::ArchiveRegistry;

/// Configuration for archive reading and writing
#[derive(Debug, Clone)]
pub struct ArchiveConfig {
    /// Pretty-print JSON output
    pub pretty: bool,
    /// Reject documents whose format version differs from this crate's
    pub strict_version: bool,
    /// Readers used to reconstruct records
    pub registry: Arc<ArchiveRegistry>,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            pretty: false,
            strict_version: true,
            registry: Arc::new(ArchiveRegistry::default()),
        }
    }
}

impl ArchiveConfig {
    /// Use a custom reader registry
    pub fn with_registry(mut self, registry: ArchiveRegistry) -> Self {
        self.registry = Arc::new(registry);
        self
    }

    /// Enable or disable pretty-printed output
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}
