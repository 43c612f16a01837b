//! `Scheduler`: a gen-server style background thread that fires a
//! callback after a debounced delay, used to trigger compaction once
//! write pressure has been sustained for a while rather than on every
//! single mutation. Modeled on the teacher's `thread.rs` `Thread<Q,R,T>`
//! pattern (own thread, message channel, explicit close-then-join on
//! drop), narrowed to the one channel this crate actually needs.

use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

enum Msg {
    Schedule(Duration),
    Cancel,
}

/// Debounces a stream of schedule/cancel requests into calls to `fire`.
/// A later `schedule` call before the deadline elapses replaces the
/// pending one rather than stacking up a second timer.
pub struct Scheduler {
    tx: Option<mpsc::Sender<Msg>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl Scheduler {
    pub fn start<F>(mut fire: F) -> Scheduler
    where
        F: FnMut() + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<Msg>();
        let handle = thread::spawn(move || {
            let mut deadline: Option<Instant> = None;
            loop {
                let wait = match deadline {
                    Some(d) => d.saturating_duration_since(Instant::now()),
                    None => Duration::from_secs(3600),
                };
                match rx.recv_timeout(wait) {
                    Ok(Msg::Schedule(delay)) => deadline = Some(Instant::now() + delay),
                    Ok(Msg::Cancel) => deadline = None,
                    Err(mpsc::RecvTimeoutError::Timeout) => {
                        if let Some(d) = deadline {
                            if Instant::now() >= d {
                                deadline = None;
                                fire();
                            }
                        }
                    }
                    Err(mpsc::RecvTimeoutError::Disconnected) => break,
                }
            }
        });
        Scheduler {
            tx: Some(tx),
            handle: Some(handle),
        }
    }

    /// Replace any pending fire with one `delay` from now.
    pub fn schedule(&self, delay: Duration) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(Msg::Schedule(delay));
        }
    }

    /// Cancel any pending fire.
    pub fn cancel(&self) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(Msg::Cancel);
        }
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        // Drop the sender first so the background thread's next
        // `recv_timeout` wakes with `Disconnected` and exits; joining
        // before this would otherwise deadlock on an indefinite wait.
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
