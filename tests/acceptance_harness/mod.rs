//! Acceptance test harness: drives the shell loop through the public API.
//!
//! Each harness owns a coordinator over the fixture catalog and a scratch
//! snapshot store, and feeds it script lines exactly as the binary does.

#![allow(dead_code)]

use catnav::config::merge_config;
use catnav::integration::{build_coordinator, process_line, Report, ShellCoordinator};
use catnav::model::CatalogTree;
use catnav::parser::load_catalog;
use catnav::source::SourceLine;
use catnav::store::SnapshotStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Catalog used by every scenario.
pub const CATALOG_FIXTURE: &str = "tests/fixtures/catalog.json";

/// Shell driven line by line.
pub struct AcceptanceTestHarness {
    coordinator: ShellCoordinator,
    store: SnapshotStore,
    next_line: usize,
}

impl AcceptanceTestHarness {
    /// Harness over the fixture catalog with default configuration.
    ///
    /// `name` keeps snapshot files of concurrent tests apart.
    pub fn new(name: &str) -> Self {
        let catalog = load_catalog(Path::new(CATALOG_FIXTURE)).expect("fixture catalog loads");
        Self::with_catalog(name, Arc::new(catalog))
    }

    /// Harness over `catalog`.
    pub fn with_catalog(name: &str, catalog: Arc<CatalogTree>) -> Self {
        let config = merge_config(None).expect("defaults merge");
        let store = SnapshotStore::new(scratch_path(name));
        let _ = store.clear();
        Self {
            coordinator: build_coordinator(catalog, &config),
            store,
            next_line: 1,
        }
    }

    /// Run one line; panics on blank lines and comments.
    pub fn run(&mut self, text: &str) -> Report {
        let line = SourceLine {
            number: self.next_line,
            text: text.to_string(),
        };
        self.next_line += 1;
        process_line(&mut self.coordinator, &line, &self.store)
            .unwrap_or_else(|| panic!("{text:?} carries no command"))
    }

    /// Run every line, returning the last report.
    pub fn run_all(&mut self, lines: &[&str]) -> Report {
        let mut last = None;
        for line in lines {
            last = Some(self.run(line));
        }
        last.expect("at least one line")
    }

    /// Run one line and require it to succeed.
    pub fn ok(&mut self, text: &str) -> Report {
        let report = self.run(text);
        assert!(report.ok, "{text:?} failed: {:?}", report.error);
        report
    }

    /// The coordinator under test.
    pub fn coordinator(&self) -> &ShellCoordinator {
        &self.coordinator
    }

    /// Mutable coordinator, for calls the command language does not cover.
    pub fn coordinator_mut(&mut self) -> &mut ShellCoordinator {
        &mut self.coordinator
    }

    /// The scratch snapshot store.
    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// Id of the current node.
    pub fn current_id(&self) -> String {
        self.coordinator.navigation().current_node().id().to_string()
    }
}

impl Drop for AcceptanceTestHarness {
    fn drop(&mut self) {
        let _ = self.store.clear();
    }
}

fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("catnav-acceptance-{}-{name}", std::process::id()))
        .join("session.json")
}
