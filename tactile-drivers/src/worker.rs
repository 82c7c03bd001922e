//! Debounce worker threads
//!
//! Each button using timed confirmation owns one worker. The worker blocks
//! on a counting wake signal; every wake starts a confirmation session that
//! polls the line at a fixed interval until the level has held for the
//! window.
//!
//! Stopping sets a flag and posts one extra wake. A session in progress
//! sees the flag at its next poll and ends without reporting.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use log::{error, trace};

use tactile_core::debounce::SessionStep;
use tactile_core::DriverError;
use tactile_hal::{GpioController, LineId, TickClock};

use crate::engine::DebounceEngine;

/// Counting wake plus stop flag shared by an engine and its worker
#[derive(Clone)]
pub struct WakeSignal {
    tx: Sender<()>,
    stop: Arc<AtomicBool>,
}

/// Create a wake signal and the receiving end for the worker
pub fn wake_channel() -> (WakeSignal, Receiver<()>) {
    let (tx, rx) = crossbeam_channel::unbounded();
    let signal = WakeSignal {
        tx,
        stop: Arc::new(AtomicBool::new(false)),
    };
    (signal, rx)
}

impl WakeSignal {
    /// Post one wake; never blocks
    pub fn wake(&self) {
        // The worker keeps the receiver alive until it exits
        let _ = self.tx.try_send(());
    }

    pub fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    fn request_stop(&self) {
        self.stop.store(true, Ordering::Release);
        self.wake();
    }
}

/// Handle to a running worker thread
pub struct DebounceWorker {
    line: LineId,
    signal: WakeSignal,
    handle: Option<JoinHandle<()>>,
}

impl DebounceWorker {
    /// Start the worker for `engine`
    ///
    /// Fails with `OutOfMemory` if the thread cannot be created.
    pub fn spawn<G, C>(
        engine: Arc<DebounceEngine<G, C>>,
        signal: WakeSignal,
        wakes: Receiver<()>,
        poll_interval: Duration,
    ) -> Result<Self, DriverError>
    where
        G: GpioController + 'static,
        C: TickClock + 'static,
    {
        let line = engine.line();
        let thread_signal = signal.clone();

        let handle = thread::Builder::new()
            .name(format!("debounce-{line}"))
            .spawn(move || run(&engine, &thread_signal, &wakes, poll_interval))
            .map_err(|e| {
                error!("failed to start debounce worker for line {}: {}", line, e);
                DriverError::OutOfMemory
            })?;

        Ok(Self {
            line,
            signal,
            handle: Some(handle),
        })
    }

    pub fn line(&self) -> LineId {
        self.line
    }

    /// Stop the worker and wait for it to exit
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };

        self.signal.request_stop();
        if handle.join().is_err() {
            error!("debounce worker for line {} panicked", self.line);
        } else {
            trace!("debounce worker for line {} stopped", self.line);
        }
    }
}

impl Drop for DebounceWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run<G, C>(
    engine: &DebounceEngine<G, C>,
    signal: &WakeSignal,
    wakes: &Receiver<()>,
    poll_interval: Duration,
) where
    G: GpioController + 'static,
    C: TickClock + 'static,
{
    while !signal.stop_requested() {
        if wakes.recv().is_err() || signal.stop_requested() {
            break;
        }
        run_session(engine, signal, poll_interval);
    }
}

fn run_session<G, C>(engine: &DebounceEngine<G, C>, signal: &WakeSignal, poll_interval: Duration)
where
    G: GpioController + 'static,
    C: TickClock + 'static,
{
    loop {
        if signal.stop_requested() {
            trace!("line {} session abandoned", engine.line());
            return;
        }

        match engine.poll() {
            SessionStep::Confirmed(change) => {
                engine.report(change);
                return;
            }
            SessionStep::Settled => return,
            SessionStep::Restarted => {
                trace!("line {} moved, window restarted", engine.line());
                thread::sleep(poll_interval);
            }
            SessionStep::Pending => thread::sleep(poll_interval),
        }
    }
}
