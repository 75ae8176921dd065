// SPDX-FileCopyrightText: 2026 Ignition Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end integration tests for the complete bootstrap pipeline.
//!
//! Each test builds an isolated bootstrapper with an in-process addon loader
//! and temp directories. Tests are independent and order-insensitive.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use ignition::bootstrap::{BootstrapOptions, Bootstrapper};
use ignition::{AwaitPolicy, BootstrapState, ComponentExport, IgnitionError};
use ignition_catalog::loader::{AddonLoader, LoadedAddon};
use ignition_core::traits::lifecycle::{
    ShutdownHook, ShutdownRegistration, StartupHook, StartupRegistration,
};
use tokio_util::sync::CancellationToken;

/// Shared event log for asserting lifecycle ordering across participants.
#[derive(Clone, Default)]
struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    fn push(&self, event: impl Into<String>) {
        self.0.lock().unwrap().push(event.into());
    }

    fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

struct Hook {
    log: EventLog,
    name: String,
    delay: Option<Duration>,
    fail: bool,
}

impl Hook {
    fn new(log: &EventLog, name: &str) -> Arc<Self> {
        Arc::new(Self {
            log: log.clone(),
            name: name.into(),
            delay: None,
            fail: false,
        })
    }

    fn failing(log: &EventLog, name: &str) -> Arc<Self> {
        Arc::new(Self {
            log: log.clone(),
            name: name.into(),
            delay: None,
            fail: true,
        })
    }

    fn slow(log: &EventLog, name: &str, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            log: log.clone(),
            name: name.into(),
            delay: Some(delay),
            fail: false,
        })
    }

    async fn run(&self, phase: &str) -> Result<(), IgnitionError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.log.push(format!("{}:{}", phase, self.name));
        if self.fail {
            Err(IgnitionError::StartupAborted(format!(
                "{} failed intentionally",
                self.name
            )))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl StartupHook for Hook {
    async fn startup(&self, _cancel: CancellationToken) -> Result<(), IgnitionError> {
        self.run("up").await
    }
}

#[async_trait]
impl ShutdownHook for Hook {
    async fn shutdown(&self, _cancel: CancellationToken) -> Result<(), IgnitionError> {
        self.run("down").await
    }
}

/// In-process loader: a file named `broken*` fails to load, anything else
/// exports one component named after the file stem with lifecycle hooks
/// logging into the shared event log. The numeric suffix of the stem (after
/// a `-`) becomes the startup/shutdown order key.
struct FakeLoader {
    log: EventLog,
}

impl AddonLoader for FakeLoader {
    fn load(&self, path: &Path) -> Result<LoadedAddon, IgnitionError> {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        if stem.starts_with("broken") {
            return Err(IgnitionError::AddonLoad {
                path: path.display().to_string(),
                message: "bad magic".into(),
            });
        }

        let order: i32 = stem
            .rsplit('-')
            .next()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);
        let contract = format!("svc.{stem}");
        let export = ComponentExport::new(contract.clone(), Arc::new(stem.clone()))
            .with_startup(StartupRegistration::new(
                order,
                AwaitPolicy::Await,
                Hook::new(&self.log, &contract),
            ))
            .with_shutdown(ShutdownRegistration::new(
                order,
                Hook::new(&self.log, &contract),
            ));

        Ok(LoadedAddon {
            name: stem,
            exports: vec![export],
            library: None,
        })
    }
}

fn addon_dir(files: &[&str]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for file in files {
        std::fs::write(dir.path().join(file), b"stub").unwrap();
    }
    dir
}

fn bootstrapper_for(dir: &tempfile::TempDir, log: &EventLog) -> Bootstrapper {
    let options = BootstrapOptions {
        addon_dirs: vec![dir.path().to_path_buf()],
        addon_pattern: Some("*.addon".into()),
        mutex_id: None,
        owner_label: "e2e".into(),
    };
    Bootstrapper::with_loader(options, Arc::new(FakeLoader { log: log.clone() })).unwrap()
}

// ---- Test 1: discovery-to-running pipeline ----

#[tokio::test]
async fn addons_discovered_composed_and_started_in_order() {
    let dir = addon_dir(&["db-10.addon", "cache-20.addon", "web-30.addon"]);
    let log = EventLog::default();
    let mut b = bootstrapper_for(&dir, &log);

    b.configure(vec![]).unwrap();
    assert!(b.initialize().await.unwrap());
    assert!(b.run().await.unwrap());
    assert_eq!(b.state(), BootstrapState::Running);

    // Startup ran strictly in ascending order keys.
    assert_eq!(
        log.events(),
        ["up:svc.db-10", "up:svc.cache-20", "up:svc.web-30"]
    );

    // Every addon's component is resolvable from the graph.
    for contract in ["svc.db-10", "svc.cache-20", "svc.web-30"] {
        let instance = b.get_export(contract).unwrap().unwrap();
        assert!(instance.downcast::<String>().is_ok());
    }

    b.dispose().await;
    assert_eq!(b.state(), BootstrapState::Disposed);
    // Shutdown ran for every participant, in its own ascending order.
    let events = log.events();
    assert_eq!(
        &events[3..],
        ["down:svc.db-10", "down:svc.cache-20", "down:svc.web-30"]
    );
}

// ---- Test 2: broken addons never abort the scan ----

#[tokio::test]
async fn broken_addon_is_isolated_from_its_neighbors() {
    let dir = addon_dir(&["good-10.addon", "broken-20.addon", "also-good-30.addon"]);
    let log = EventLog::default();
    let mut b = bootstrapper_for(&dir, &log);

    b.configure(vec![]).unwrap();
    // Loader failure is a per-file outcome, not an initialize error.
    assert!(b.initialize().await.unwrap());
    assert!(b.run().await.unwrap());

    assert!(b.get_export("svc.good-10").unwrap().is_some());
    assert!(b.get_export("svc.also-good-30").unwrap().is_some());
    assert!(b.get_export("svc.broken-20").unwrap().is_none());

    b.dispose().await;
}

// ---- Test 3: fatal startup keeps the bootstrapper out of Running ----

#[tokio::test]
async fn fatal_awaited_startup_failure_blocks_running_but_not_dispose() {
    let log = EventLog::default();
    let mut b = Bootstrapper::new(BootstrapOptions::new()).unwrap();
    b.configure(vec![]).unwrap();

    let registry = b.lifecycle().unwrap();
    registry
        .register_startup("boom", 10, AwaitPolicy::Await, Hook::failing(&log, "boom"))
        .unwrap();
    registry
        .register_startup("never", 20, AwaitPolicy::Await, Hook::new(&log, "never"))
        .unwrap();
    registry
        .register_shutdown("cleanup", 10, Hook::new(&log, "cleanup"))
        .unwrap();

    assert!(b.initialize().await.unwrap());
    // The failure is reported as a result, not an error.
    assert!(!b.run().await.unwrap());
    assert_eq!(b.state(), BootstrapState::Initialized);

    let report = b.startup_report().unwrap();
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].name, "boom");
    assert!(!log.events().iter().any(|e| e.contains("never")));

    // Dispose still drives the shutdown phase.
    b.dispose().await;
    assert!(log.events().contains(&"down:cleanup".to_string()));
}

// ---- Test 4: fire-and-forget outcomes are drained, never dropped ----

#[tokio::test]
async fn fire_and_forget_failure_is_observed_in_the_report() {
    let log = EventLog::default();
    let mut b = Bootstrapper::new(BootstrapOptions::new()).unwrap();
    b.configure(vec![]).unwrap();

    let registry = b.lifecycle().unwrap();
    registry
        .register_startup(
            "bg-slow",
            10,
            AwaitPolicy::FireAndForget,
            Hook::slow(&log, "bg-slow", Duration::from_millis(30)),
        )
        .unwrap();
    registry
        .register_startup(
            "bg-boom",
            20,
            AwaitPolicy::FireAndForget,
            Hook::failing(&log, "bg-boom"),
        )
        .unwrap();
    registry
        .register_startup("fg", 30, AwaitPolicy::Await, Hook::new(&log, "fg"))
        .unwrap();

    assert!(b.initialize().await.unwrap());
    assert!(!b.run().await.unwrap());

    let report = b.startup_report().unwrap();
    // Three launched, one drained failure, and the slow background unit
    // completed before the phase reported.
    assert_eq!(report.launched, 3);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].name, "bg-boom");
    assert!(log.events().contains(&"up:bg-slow".to_string()));

    b.dispose().await;
}

// ---- Test 5: shutdown failures are isolated ----

#[tokio::test]
async fn dispose_reaches_every_shutdown_participant() {
    let log = EventLog::default();
    let mut b = Bootstrapper::new(BootstrapOptions::new()).unwrap();
    b.configure(vec![]).unwrap();

    let registry = b.lifecycle().unwrap();
    registry
        .register_shutdown("first", 10, Hook::new(&log, "first"))
        .unwrap();
    registry
        .register_shutdown("boom", 20, Hook::failing(&log, "boom"))
        .unwrap();
    registry
        .register_shutdown("last", 30, Hook::new(&log, "last"))
        .unwrap();

    assert!(b.initialize().await.unwrap());
    assert!(b.run().await.unwrap());
    b.dispose().await;

    let events = log.events();
    assert!(events.contains(&"down:first".to_string()));
    assert!(events.contains(&"down:last".to_string()));
    let report = b.shutdown_report().unwrap();
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].name, "boom");
}

// ---- Test 6: cancellation skips pending startup work ----

#[tokio::test]
async fn cancelled_token_prevents_startup_and_allows_clean_dispose() {
    let log = EventLog::default();
    let mut b = Bootstrapper::new(BootstrapOptions::new()).unwrap();
    b.configure(vec![]).unwrap();

    let registry = b.lifecycle().unwrap();
    registry
        .register_startup("one", 10, AwaitPolicy::Await, Hook::new(&log, "one"))
        .unwrap();
    registry
        .register_shutdown("down", 10, Hook::new(&log, "down"))
        .unwrap();

    assert!(b.initialize().await.unwrap());
    b.cancellation_token().cancel();
    assert!(!b.run().await.unwrap());
    assert_eq!(b.state(), BootstrapState::Initialized);
    assert!(!log.events().iter().any(|e| e.starts_with("up:")));

    // Dispose uses a fresh token, so teardown still runs.
    b.dispose().await;
    assert!(log.events().contains(&"down:down".to_string()));
}

// ---- Test 7: single-instance mutex through the bootstrapper ----

#[tokio::test]
#[serial_test::serial]
async fn second_bootstrapper_observes_mutex_contention() {
    let options = || {
        BootstrapOptions::new()
            .with_mutex_id("ignition-e2e-bootstrap-mutex")
    };

    let mut first = Bootstrapper::new(options()).unwrap();
    assert!(first.is_mutex_locked());

    // A second instance constructs fine but does not hold the mutex.
    let mut second = Bootstrapper::new(options()).unwrap();
    assert!(!second.is_mutex_locked());
    second.dispose().await;

    // Disposing the holder releases the mutex for the next instance.
    first.dispose().await;
    let mut third = Bootstrapper::new(options()).unwrap();
    assert!(third.is_mutex_locked());
    third.dispose().await;
}
