//! End-to-end activation flow: registry lookup, sandboxed context,
//! lifecycle hooks, contributions, and event flow.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::{Map, json};

use orbita_capabilities::Capability;
use orbita_core::{OrbitId, QueryResult, TaskItem, TaskQueries, TaskStatus, UserId};
use orbita_events::{DomainEvent, EventError, EventHandler, EventResult, OrbitEvents};
use orbita_orbits::{
    MANIFEST_FILE_NAME, Orbit, OrbitError, OrbitManifest, OrbitMetadata, OrbitRegistry,
    OrbitResult,
};
use orbita_runtime::{OrbitRuntime, RuntimeConfig};
use orbita_sandbox::{HostServices, OrbitContext, ToolRegistrar};

/// Fixed task source: two open tasks for everyone.
struct StaticTasks;

#[async_trait]
impl TaskQueries for StaticTasks {
    async fn list(&self, _user: &UserId) -> QueryResult<Vec<TaskItem>> {
        Ok(vec![
            TaskItem {
                id: "t-1".into(),
                title: "Prepare standup notes".into(),
                status: TaskStatus::Open,
                due: None,
                project: None,
                tags: vec![],
            },
            TaskItem {
                id: "t-2".into(),
                title: "Review design doc".into(),
                status: TaskStatus::Open,
                due: None,
                project: None,
                tags: vec![],
            },
        ])
    }

    async fn get(&self, _user: &UserId, _task_id: &str) -> QueryResult<Option<TaskItem>> {
        Ok(None)
    }
}

struct CompletionCounter {
    completions: AtomicUsize,
}

#[async_trait]
impl EventHandler for CompletionCounter {
    async fn handle(&self, _event: &DomainEvent) -> EventResult<()> {
        self.completions.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct FailingHandler;

#[async_trait]
impl EventHandler for FailingHandler {
    async fn handle(&self, _event: &DomainEvent) -> EventResult<()> {
        Err(EventError::HandlerFailed("handler bug".into()))
    }
}

/// A focus-timer orbit: counts open tasks into storage on initialize,
/// contributes a tool, and watches task completions.
struct PomodoroOrbit {
    counter: Arc<CompletionCounter>,
}

impl PomodoroOrbit {
    fn new() -> Self {
        Self {
            counter: Arc::new(CompletionCounter {
                completions: AtomicUsize::new(0),
            }),
        }
    }
}

#[async_trait]
impl Orbit for PomodoroOrbit {
    fn metadata(&self) -> OrbitMetadata {
        OrbitMetadata {
            id: OrbitId::from_static("acme.pomodoro"),
            name: "Pomodoro".into(),
            version: "1.0.0".into(),
            description: Some("Focus sessions sized to the task backlog".into()),
        }
    }

    fn required_capabilities(&self) -> Vec<Capability> {
        vec![
            Capability::ReadTasks,
            Capability::ReadStorage,
            Capability::WriteStorage,
            Capability::RegisterTools,
            Capability::SubscribeEvents,
        ]
    }

    async fn initialize(&self, ctx: &OrbitContext) -> OrbitResult<()> {
        let tasks = ctx
            .tasks()
            .list()
            .await
            .map_err(|e| OrbitError::Internal(e.to_string()))?;
        ctx.storage()
            .set("open_tasks", tasks.len().to_string().into_bytes(), None)
            .await
            .map_err(|e| OrbitError::Internal(e.to_string()))?;
        ctx.logger().info("pomodoro initialized");
        Ok(())
    }

    async fn shutdown(&self) -> OrbitResult<()> {
        Ok(())
    }

    fn register_tools(&self, registrar: &mut ToolRegistrar) -> OrbitResult<()> {
        registrar
            .register(
                "start_session",
                "Start a focus session",
                json!({
                    "type": "object",
                    "properties": { "minutes": { "type": "integer" } }
                }),
            )
            .map_err(|e| OrbitError::Internal(e.to_string()))
    }

    fn subscribe_events(&self, events: &OrbitEvents) -> OrbitResult<()> {
        events
            .subscribe(
                "tasks.task.completed",
                Arc::clone(&self.counter) as Arc<dyn EventHandler>,
            )
            .map_err(|e| OrbitError::Internal(e.to_string()))
    }
}

fn runtime_with(services: HostServices) -> OrbitRuntime {
    OrbitRuntime::new(
        Arc::new(OrbitRegistry::new()),
        Arc::new(services),
        RuntimeConfig::with_search_paths(vec![]),
    )
}

#[tokio::test]
async fn full_activation_flow() {
    let services = HostServices::builder()
        .tasks(Arc::new(StaticTasks) as Arc<dyn TaskQueries>)
        .build();
    let runtime = runtime_with(services);

    let orbit = Arc::new(PomodoroOrbit::new());
    let counter = Arc::clone(&orbit.counter);
    runtime
        .registry()
        .register_builtin(orbit as Arc<dyn Orbit>)
        .await
        .unwrap();

    let id = OrbitId::from_static("acme.pomodoro");
    let user = UserId::from_static("user-1");

    // The builtin's synthesized manifest matches its requirements.
    runtime.registry().validate_capabilities(&id).await.unwrap();

    let activation = runtime.activate(&id, &user).await.unwrap();

    // Tool contribution, qualified under the orbit's namespace.
    assert_eq!(activation.tools.len(), 1);
    assert_eq!(activation.tools[0].name, "orbit:acme.pomodoro:start_session");
    assert!(activation.commands.is_empty());

    // Initialize observed the host's tasks through the sandbox and
    // persisted under the scoped namespace.
    let stored = activation.context.storage().get("open_tasks").await.unwrap();
    assert_eq!(stored, b"2".to_vec());

    // The subscription is live: a host domain event reaches the orbit.
    let mut payload = Map::new();
    payload.insert("task_id".into(), json!("t-1"));
    let invoked = runtime
        .dispatch_event(&DomainEvent::new("tasks.task.completed", payload))
        .await;
    assert_eq!(invoked, 1);
    assert_eq!(counter.completions.load(Ordering::SeqCst), 1);

    // Unrelated event types do not reach it.
    let invoked = runtime
        .dispatch_event(&DomainEvent::new("habits.habit.completed", Map::new()))
        .await;
    assert_eq!(invoked, 0);
}

#[tokio::test]
async fn activation_fails_fast_when_manifest_withholds_capabilities() {
    // Factory-registered orbit whose manifest declares nothing: the
    // context hands out null objects and initialize fails with a typed
    // error instead of empty data.
    let services = HostServices::builder()
        .tasks(Arc::new(StaticTasks) as Arc<dyn TaskQueries>)
        .build();
    let runtime = runtime_with(services);

    let manifest = OrbitManifest {
        id: "acme.pomodoro".into(),
        name: "Pomodoro".into(),
        version: "1.0.0".into(),
        kind: "orbit".into(),
        author: None,
        description: None,
        license: None,
        homepage: None,
        min_api_version: None,
        capabilities: vec![],
        entitlement: None,
        config_schema: None,
    };
    runtime
        .registry()
        .register_factory(
            manifest,
            Arc::new(|| Ok(Arc::new(PomodoroOrbit::new()) as Arc<dyn Orbit>)),
        )
        .await
        .unwrap();

    let id = OrbitId::from_static("acme.pomodoro");
    let user = UserId::from_static("user-1");

    let err = runtime.activate(&id, &user).await.unwrap_err();
    assert!(matches!(err, OrbitError::Internal(_)));

    // The self-consistency check names the same gap.
    let err = runtime
        .registry()
        .validate_capabilities(&id)
        .await
        .unwrap_err();
    assert!(matches!(err, OrbitError::Capability(_)));
}

#[tokio::test]
async fn one_orbit_handler_failure_never_suppresses_another() {
    let runtime = runtime_with(HostServices::builder().build());
    let bus = runtime.services().event_bus();

    let noisy = OrbitId::from_static("acme.noisy");
    let steady = OrbitId::from_static("acme.steady");
    let counter = Arc::new(CompletionCounter {
        completions: AtomicUsize::new(0),
    });

    bus.subscribe(&noisy, "inbox.item.received", Arc::new(FailingHandler))
        .unwrap();
    bus.subscribe(
        &steady,
        "inbox.item.received",
        Arc::clone(&counter) as Arc<dyn EventHandler>,
    )
    .unwrap();

    let invoked = runtime
        .dispatch_event(&DomainEvent::new("inbox.item.received", Map::new()))
        .await;
    assert_eq!(invoked, 2);
    assert_eq!(counter.completions.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn storage_is_isolated_per_user_within_one_orbit() {
    let services = HostServices::builder()
        .tasks(Arc::new(StaticTasks) as Arc<dyn TaskQueries>)
        .build();
    let runtime = runtime_with(services);
    runtime
        .registry()
        .register_builtin(Arc::new(PomodoroOrbit::new()) as Arc<dyn Orbit>)
        .await
        .unwrap();

    let id = OrbitId::from_static("acme.pomodoro");
    let alice = runtime
        .activate(&id, &UserId::from_static("alice"))
        .await
        .unwrap();
    let bob = runtime
        .activate(&id, &UserId::from_static("bob"))
        .await
        .unwrap();

    // Shared instance, distinct contexts.
    assert!(Arc::ptr_eq(&alice.orbit, &bob.orbit));

    alice
        .context
        .storage()
        .set("preference", b"short-sessions".to_vec(), None)
        .await
        .unwrap();

    let keys = bob.context.storage().list("").await.unwrap();
    assert_eq!(keys, vec!["open_tasks".to_string()]);
}

#[tokio::test]
async fn discovery_registers_compatible_manifests_only() {
    let dir = tempfile::tempdir().unwrap();

    let write = |name: &str, body: &str| {
        let orbit_dir = dir.path().join(name);
        std::fs::create_dir_all(&orbit_dir).unwrap();
        std::fs::write(orbit_dir.join(MANIFEST_FILE_NAME), body).unwrap();
    };
    write(
        "current",
        r#"{"id": "acme.current", "name": "Current", "version": "1.0.0", "type": "orbit"}"#,
    );
    write(
        "future",
        r#"{"id": "acme.future", "name": "Future", "version": "1.0.0", "type": "orbit",
            "min_api_version": "99.0.0"}"#,
    );

    let runtime = OrbitRuntime::new(
        Arc::new(OrbitRegistry::new()),
        Arc::new(HostServices::builder().build()),
        RuntimeConfig::with_search_paths(vec![dir.path().to_path_buf()]),
    );

    let (registered, errors) = runtime.discover_and_register().await;
    assert_eq!(registered, 1);
    assert_eq!(errors.len(), 1);

    assert!(
        runtime
            .registry()
            .is_registered(&OrbitId::from_static("acme.current"))
            .await
    );
    assert!(
        !runtime
            .registry()
            .is_registered(&OrbitId::from_static("acme.future"))
            .await
    );
}

#[tokio::test]
async fn shutdown_is_best_effort_across_orbits() {
    let runtime = runtime_with(HostServices::builder().build());

    struct StubbornOrbit;

    #[async_trait]
    impl Orbit for StubbornOrbit {
        fn metadata(&self) -> OrbitMetadata {
            OrbitMetadata {
                id: OrbitId::from_static("acme.stubborn"),
                name: "Stubborn".into(),
                version: "1.0.0".into(),
                description: None,
            }
        }

        fn required_capabilities(&self) -> Vec<Capability> {
            vec![]
        }

        async fn initialize(&self, _ctx: &OrbitContext) -> OrbitResult<()> {
            Ok(())
        }

        async fn shutdown(&self) -> OrbitResult<()> {
            Err(OrbitError::Internal("refuses to die".into()))
        }
    }

    let tame = Arc::new(PomodoroOrbit::new());
    runtime
        .registry()
        .register_builtin(Arc::new(StubbornOrbit) as Arc<dyn Orbit>)
        .await
        .unwrap();
    runtime
        .registry()
        .register_builtin(tame as Arc<dyn Orbit>)
        .await
        .unwrap();

    // The stubborn orbit's failure is logged, not propagated, and every
    // entry still reaches the terminal state.
    runtime.shutdown().await;

    for id in ["acme.stubborn", "acme.pomodoro"] {
        let status = runtime
            .registry()
            .status(&OrbitId::from_static(id))
            .await
            .unwrap();
        assert_eq!(status, orbita_orbits::OrbitStatus::Shutdown);
    }
}
