//! `SchedulerManager` registration/start/stop bookkeeping, using a fake
//! scheduler that does no real work.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use flow_telemetry::scheduler::{Scheduler, SchedulerManager};
use tokio::sync::watch;

struct FakeScheduler {
    name: String,
    runs: Arc<AtomicUsize>,
}

#[async_trait]
impl Scheduler for FakeScheduler {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(self: Arc<Self>, mut stop_rx: watch::Receiver<bool>) {
        self.runs.fetch_add(1, Ordering::SeqCst);
        let _ = stop_rx.changed().await;
    }
}

#[tokio::test]
async fn register_increments_count() {
    let manager = SchedulerManager::new();
    assert_eq!(manager.count().await, 0);

    let runs = Arc::new(AtomicUsize::new(0));
    manager
        .register(Arc::new(FakeScheduler { name: "a".into(), runs: runs.clone() }))
        .await;
    manager
        .register(Arc::new(FakeScheduler { name: "b".into(), runs: runs.clone() }))
        .await;

    assert_eq!(manager.count().await, 2);
}

#[tokio::test]
async fn start_all_runs_every_registered_scheduler_and_stop_all_joins_them() {
    let manager = SchedulerManager::new();
    let runs = Arc::new(AtomicUsize::new(0));
    manager
        .register(Arc::new(FakeScheduler { name: "a".into(), runs: runs.clone() }))
        .await;
    manager
        .register(Arc::new(FakeScheduler { name: "b".into(), runs: runs.clone() }))
        .await;

    manager.start_all().await;
    // give the spawned tasks a chance to record their run before stopping.
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    manager.stop_all().await;

    assert_eq!(runs.load(Ordering::SeqCst), 2);
}
