use std::time::Duration;

use tokio::select;
use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Handle to a running repeating timer. Dropping it cancels the task.
#[derive(Debug)]
pub struct AutoslideTimer {
    generation: u64,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl AutoslideTimer {
    /// Spawns a task that sends `generation` to `ticks` every `every`,
    /// starting one full interval from now. It stops when `parent` or the
    /// returned handle is cancelled, or when the receiver goes away.
    pub fn spawn(
        generation: u64,
        every: Duration,
        ticks: Sender<u64>,
        parent: &CancellationToken,
    ) -> Self {
        let cancel = parent.child_token();
        let handle = tokio::spawn(run(generation, every, ticks, cancel.clone()));
        Self {
            generation,
            cancel,
            handle: Some(handle),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Cancels the task and waits for it to exit.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for AutoslideTimer {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run(generation: u64, every: Duration, ticks: Sender<u64>, cancel: CancellationToken) {
    let mut interval = interval_at(Instant::now() + every, every);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    debug!(generation, every_ms = every.as_millis() as u64, "autoslide timer running");

    loop {
        select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {}
        }
        trace!(generation, "autoslide tick");
        select! {
            biased;
            _ = cancel.cancelled() => break,
            sent = ticks.send(generation) => {
                if sent.is_err() {
                    break;
                }
            }
        }
    }
    debug!(generation, "autoslide timer exited");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn ticks_at_interval_until_cancelled() {
        let (tx, mut rx) = mpsc::channel(4);
        let root = CancellationToken::new();
        let start = Instant::now();
        let timer = AutoslideTimer::spawn(7, Duration::from_millis(250), tx, &root);

        assert_eq!(rx.recv().await, Some(7));
        assert_eq!(start.elapsed(), Duration::from_millis(250));
        assert_eq!(rx.recv().await, Some(7));
        assert_eq!(start.elapsed(), Duration::from_millis(500));

        timer.shutdown().await;
        assert_eq!(rx.recv().await, None, "sender is dropped once the task exits");
    }

    #[tokio::test(start_paused = true)]
    async fn parent_cancellation_stops_the_timer() {
        let (tx, mut rx) = mpsc::channel(4);
        let root = CancellationToken::new();
        let timer = AutoslideTimer::spawn(1, Duration::from_millis(100), tx, &root);
        root.cancel();
        assert!(timer.is_cancelled());
        assert_eq!(rx.recv().await, None);
    }
}
