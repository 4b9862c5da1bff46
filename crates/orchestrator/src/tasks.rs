//! Background work that outlives a turn.

use std::future::Future;

use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{debug, error};

/// Tasks spawned by turns (insights), drained on shutdown.
#[derive(Default)]
pub struct BackgroundTasks {
    tasks: Mutex<JoinSet<()>>,
}

impl BackgroundTasks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a task and reap any that already finished.
    pub async fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut tasks = self.tasks.lock().await;
        while let Some(result) = tasks.try_join_next() {
            log_outcome(result);
        }
        tasks.spawn(task);
    }

    /// Number of tasks not yet reaped.
    pub async fn len(&self) -> usize {
        self.tasks.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Wait until every spawned task has finished, including tasks spawned
    /// while waiting.
    pub async fn wait_idle(&self) {
        loop {
            let mut drained = std::mem::take(&mut *self.tasks.lock().await);
            if drained.is_empty() {
                return;
            }
            debug!("Waiting for {} background task(s)", drained.len());
            while let Some(result) = drained.join_next().await {
                log_outcome(result);
            }
        }
    }
}

fn log_outcome(result: Result<(), tokio::task::JoinError>) {
    if let Err(e) = result {
        error!("Background task failed: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_wait_idle_drains() {
        let tasks = BackgroundTasks::new();
        let done = Arc::new(AtomicUsize::new(0));
        for _ in 0..3 {
            let done = done.clone();
            tasks
                .spawn(async move {
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    done.fetch_add(1, Ordering::SeqCst);
                })
                .await;
        }

        tasks.wait_idle().await;
        assert_eq!(done.load(Ordering::SeqCst), 3);
        assert!(tasks.is_empty().await);
    }

    #[tokio::test]
    async fn test_panicking_task_is_logged() {
        let tasks = BackgroundTasks::new();
        tasks.spawn(async { panic!("boom") }).await;
        tasks.wait_idle().await;
        assert!(tasks.is_empty().await);
    }
}
