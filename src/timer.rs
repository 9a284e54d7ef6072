use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::debug;

use crate::runtime::{EventSender, GameEvent};

const ONE_SECOND: Duration = Duration::from_secs(1);

/// Cancellable repeating task that emits one `Tick` per period.
///
/// At most one task runs at a time. Every start bumps the epoch, and a tick
/// only counts while its epoch is current, so ticks queued by a cancelled
/// task are discarded by the consumer.
#[derive(Debug)]
pub struct SecondTimer {
    period: Duration,
    epoch: u64,
    handle: Option<JoinHandle<()>>,
}

impl SecondTimer {
    pub fn new() -> Self {
        Self::with_period(ONE_SECOND)
    }

    pub fn with_period(period: Duration) -> Self {
        Self {
            period,
            epoch: 0,
            handle: None,
        }
    }

    /// Starts ticking into `tx`, replacing any running task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self, tx: EventSender) -> u64 {
        self.stop();
        self.epoch += 1;
        let epoch = self.epoch;
        let period = self.period;

        self.handle = Some(tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            loop {
                interval.tick().await;
                if tx.send(GameEvent::Tick { epoch }).is_err() {
                    break;
                }
            }
        }));
        debug!(epoch, "timer started");
        epoch
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!(epoch = self.epoch, "timer stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Whether a tick from `epoch` belongs to the running task.
    pub fn is_current(&self, epoch: u64) -> bool {
        self.is_running() && epoch == self.epoch
    }
}

impl Default for SecondTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SecondTimer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::Runner;

    fn drain_ticks(runner: &mut Runner) -> Vec<u64> {
        let mut epochs = vec![];
        while let Some(event) = runner.try_step() {
            if let GameEvent::Tick { epoch } = event {
                epochs.push(epoch);
            }
        }
        epochs
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_second() {
        let mut runner = Runner::new();
        let mut timer = SecondTimer::new();
        let epoch = timer.start(runner.sender());

        time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(drain_ticks(&mut runner), vec![epoch; 3]);
        assert!(timer.is_current(epoch));
    }

    #[tokio::test(start_paused = true)]
    async fn no_ticks_after_stop() {
        let mut runner = Runner::new();
        let mut timer = SecondTimer::new();
        let epoch = timer.start(runner.sender());

        time::sleep(Duration::from_millis(1500)).await;
        timer.stop();
        assert!(!timer.is_running());
        assert!(!timer.is_current(epoch));

        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(drain_ticks(&mut runner), vec![epoch]);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_leaves_a_single_task() {
        let mut runner = Runner::new();
        let mut timer = SecondTimer::new();
        let first = timer.start(runner.sender());
        let second = timer.start(runner.sender());
        assert_ne!(first, second);
        assert!(!timer.is_current(first));

        time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(drain_ticks(&mut runner), vec![second, second]);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_timer_cancels_it() {
        let mut runner = Runner::new();
        {
            let mut timer = SecondTimer::new();
            timer.start(runner.sender());
        }
        time::sleep(Duration::from_secs(3)).await;
        assert!(drain_ticks(&mut runner).is_empty());
    }
}
