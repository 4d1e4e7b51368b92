//! The daily digest job: a constructed service with an explicit start/stop
//! lifecycle, never a process-wide singleton.

use std::sync::{Arc, Condvar, Mutex};
use std::thread::JoinHandle;

use chrono::{Duration, Local};

use fintrack_core::{Clock, DigestService, FinanceStore};

use crate::bot::transport::MessageSender;

/// Fires once per day at a configured local hour and pushes every eligible
/// user their one-line spending digest. One failed delivery never aborts
/// the batch; each attempt is logged on its own.
pub struct DigestJob {
    store: Arc<dyn FinanceStore>,
    clock: Arc<dyn Clock>,
    sender: Arc<dyn MessageSender>,
    fire_hour: u32,
    currency_symbol: String,
    shutdown: Arc<Shutdown>,
    worker: Option<JoinHandle<()>>,
}

struct Shutdown {
    stopped: Mutex<bool>,
    signal: Condvar,
}

impl DigestJob {
    pub fn new(
        store: Arc<dyn FinanceStore>,
        clock: Arc<dyn Clock>,
        sender: Arc<dyn MessageSender>,
        fire_hour: u32,
        currency_symbol: impl Into<String>,
    ) -> Self {
        Self {
            store,
            clock,
            sender,
            fire_hour: fire_hour.min(23),
            currency_symbol: currency_symbol.into(),
            shutdown: Arc::new(Shutdown {
                stopped: Mutex::new(false),
                signal: Condvar::new(),
            }),
            worker: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Delivers one batch immediately. Returns how many messages went out.
    pub fn run_once(&self) -> usize {
        run_batch(
            self.store.as_ref(),
            self.clock.as_ref(),
            self.sender.as_ref(),
            &self.currency_symbol,
        )
    }

    /// Spawns the worker thread. Calling `start` twice is a no-op.
    pub fn start(&mut self) {
        if self.worker.is_some() {
            return;
        }
        *self
            .shutdown
            .stopped
            .lock()
            .expect("digest shutdown lock poisoned") = false;

        let store = Arc::clone(&self.store);
        let clock = Arc::clone(&self.clock);
        let sender = Arc::clone(&self.sender);
        let shutdown = Arc::clone(&self.shutdown);
        let fire_hour = self.fire_hour;
        let symbol = self.currency_symbol.clone();

        self.worker = Some(std::thread::spawn(move || {
            let mut stopped = shutdown
                .stopped
                .lock()
                .expect("digest shutdown lock poisoned");
            while !*stopped {
                let wait = duration_until_hour(fire_hour);
                let (guard, timeout) = shutdown
                    .signal
                    .wait_timeout(stopped, wait)
                    .expect("digest shutdown lock poisoned");
                stopped = guard;
                if *stopped {
                    break;
                }
                if timeout.timed_out() {
                    drop(stopped);
                    run_batch(store.as_ref(), clock.as_ref(), sender.as_ref(), &symbol);
                    stopped = shutdown
                        .stopped
                        .lock()
                        .expect("digest shutdown lock poisoned");
                }
            }
        }));
        tracing::info!(hour = self.fire_hour, "daily digest job started");
    }

    /// Signals the worker and joins it.
    pub fn stop(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        *self
            .shutdown
            .stopped
            .lock()
            .expect("digest shutdown lock poisoned") = true;
        self.shutdown.signal.notify_all();
        if worker.join().is_err() {
            tracing::error!("digest worker panicked");
        } else {
            tracing::info!("daily digest job stopped");
        }
    }
}

impl Drop for DigestJob {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_batch(
    store: &dyn FinanceStore,
    clock: &dyn Clock,
    sender: &dyn MessageSender,
    currency_symbol: &str,
) -> usize {
    let today = clock.today();
    let messages = match DigestService::prepare(store, today, currency_symbol) {
        Ok(messages) => messages,
        Err(err) => {
            tracing::error!(error = %err, "failed to prepare daily digests");
            return 0;
        }
    };
    let mut delivered = 0;
    for message in messages {
        match sender.send(message.chat_id, &message.text) {
            Ok(()) => {
                delivered += 1;
                tracing::info!(chat_id = message.chat_id, "daily digest delivered");
            }
            Err(err) => {
                tracing::warn!(
                    chat_id = message.chat_id,
                    error = %err,
                    "daily digest delivery failed"
                );
            }
        }
    }
    delivered
}

/// Wall-clock wait until the next local occurrence of `hour:00`.
fn duration_until_hour(hour: u32) -> std::time::Duration {
    let now = Local::now().naive_local();
    let today_fire = now
        .date()
        .and_hms_opt(hour, 0, 0)
        .expect("fire hour is clamped to 0..=23");
    let fire = if now < today_fire {
        today_fire
    } else {
        today_fire + Duration::days(1)
    };
    (fire - now).to_std().unwrap_or_default()
}
