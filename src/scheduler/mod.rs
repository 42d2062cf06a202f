//! Background schedulers: a 10-minute usage collector and a midnight
//! average roll-up, one pair per rolling-series metric (cpu/memory/disk),
//! managed by a single registry.
//!
//! Grounded on `original_source/services/schedulerManager.go`'s
//! `SchedulerManager` (register, then `StartAll`/`StopAll` spawn/join a
//! goroutine per registered `interfaces.Scheduler`) and the Mikrotik CPU
//! scheduler pair under `snmp/mikrotik/Schedules/`.

pub mod collector;
pub mod midnight;

use std::sync::Arc;

use async_trait::async_trait;
use log::info;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

/// One background job the manager can start and stop. `run` owns its loop
/// and exits once `stop_rx` reports `true`, mirroring `Start`/`StopCh` in
/// the original's `interfaces.Scheduler`.
#[async_trait]
pub trait Scheduler: Send + Sync + 'static {
    fn name(&self) -> &str;
    async fn run(self: Arc<Self>, stop_rx: watch::Receiver<bool>);
}

struct RunningScheduler {
    stop_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

pub struct SchedulerManager {
    schedulers: Mutex<Vec<Arc<dyn Scheduler>>>,
    running: Mutex<Vec<RunningScheduler>>,
}

impl Default for SchedulerManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SchedulerManager {
    pub fn new() -> Self {
        SchedulerManager {
            schedulers: Mutex::new(Vec::new()),
            running: Mutex::new(Vec::new()),
        }
    }

    pub async fn register(&self, scheduler: Arc<dyn Scheduler>) {
        self.schedulers.lock().await.push(scheduler);
    }

    pub async fn start_all(&self) {
        let schedulers = self.schedulers.lock().await.clone();
        info!("starting {} scheduler(s)", schedulers.len());
        let mut running = self.running.lock().await;
        for scheduler in schedulers {
            let (stop_tx, stop_rx) = watch::channel(false);
            let name = scheduler.name().to_string();
            let handle = tokio::spawn(async move {
                scheduler.run(stop_rx).await;
                info!("scheduler '{name}' exited");
            });
            running.push(RunningScheduler { stop_tx, handle });
        }
    }

    pub async fn stop_all(&self) {
        let mut running = self.running.lock().await;
        for job in running.iter() {
            let _ = job.stop_tx.send(true);
        }
        for job in running.drain(..) {
            let _ = job.handle.await;
        }
        info!("all schedulers stopped");
    }

    pub async fn count(&self) -> usize {
        self.schedulers.lock().await.len()
    }
}
