//! Asynchronous reaping of background children.
//!
//! A worker thread owns every background [`Child`] still running. It is woken by
//! two producers over one channel: the launcher, which hands over each new
//! background child, and a listener thread turning `SIGCHLD` into wake-ups. On
//! every wake-up the worker polls its children without blocking and sends a
//! [`Notice`] for each one that has gone.
//!
//! Only background children are ever polled, so a foreground `wait` in the
//! interpreter loop can never lose its child's status to the reaper.

use anyhow::{Context, Result};
use signal_hook::consts::SIGCHLD;
use signal_hook::iterator::{Handle, Signals};
use std::io;
use std::process::Child;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

enum Event {
    Spawned(Child),
    ChildExited,
    Shutdown,
}

/// Termination report for a background child.
#[derive(Debug)]
pub enum Notice {
    /// The child with this pid has terminated and been reaped.
    Terminated(u32),
    /// Polling the child failed; it is no longer tracked.
    Lost(u32, io::Error),
}

/// Cloneable sender side used to hand background children to the reaper.
#[derive(Clone)]
pub struct ReaperHandle {
    events: Sender<Event>,
}

impl ReaperHandle {
    /// Give `child` to the reaper. It will be reported once it terminates.
    pub fn adopt(&self, child: Child) -> Result<()> {
        let pid = child.id();
        self.events
            .send(Event::Spawned(child))
            .map_err(|_| anyhow::anyhow!("reaper is gone, can't track pid {}", pid))
    }
}

/// The running reaper: worker thread, signal listener and the notice channel.
///
/// Dropping it stops both threads. Children still running are left alone.
pub struct Reaper {
    handle: ReaperHandle,
    notices: Receiver<Notice>,
    signals: Handle,
    listener: Option<JoinHandle<()>>,
    worker: Option<JoinHandle<()>>,
}

impl Reaper {
    pub fn start() -> Result<Self> {
        let (events_tx, events_rx) = mpsc::channel();
        let (notices_tx, notices_rx) = mpsc::channel();

        let mut signals = Signals::new([SIGCHLD]).context("can't listen for SIGCHLD")?;
        let signals_handle = signals.handle();

        let wake = events_tx.clone();
        let listener = thread::Builder::new()
            .name("sigchld".into())
            .spawn(move || {
                for _ in signals.forever() {
                    if wake.send(Event::ChildExited).is_err() {
                        break;
                    }
                }
            })
            .context("can't start the SIGCHLD listener")?;

        let worker = thread::Builder::new()
            .name("reaper".into())
            .spawn(move || reap(events_rx, notices_tx))
            .context("can't start the reaper")?;

        Ok(Self {
            handle: ReaperHandle { events: events_tx },
            notices: notices_rx,
            signals: signals_handle,
            listener: Some(listener),
            worker: Some(worker),
        })
    }

    pub fn handle(&self) -> ReaperHandle {
        self.handle.clone()
    }

    /// Notices that have arrived so far, without waiting.
    pub fn drain(&self) -> Vec<Notice> {
        self.notices.try_iter().collect()
    }

    /// Wait up to `timeout` for the next notice.
    pub fn next_notice(&self, timeout: Duration) -> Option<Notice> {
        match self.notices.recv_timeout(timeout) {
            Ok(notice) => Some(notice),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

impl Drop for Reaper {
    fn drop(&mut self) {
        self.signals.close();
        let _ = self.handle.events.send(Event::Shutdown);
        if let Some(listener) = self.listener.take() {
            let _ = listener.join();
        }
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn reap(events: Receiver<Event>, notices: Sender<Notice>) {
    let mut children: Vec<Child> = Vec::new();

    while let Ok(event) = events.recv() {
        match event {
            Event::Spawned(child) => children.push(child),
            Event::ChildExited => {}
            Event::Shutdown => break,
        }

        // A SIGCHLD may have arrived before its child was handed over, so poll
        // after every event, not only after signals.
        children.retain_mut(|child| {
            let pid = child.id();
            let notice = match child.try_wait() {
                Ok(None) => return true,
                Ok(Some(_)) => Notice::Terminated(pid),
                Err(err) => Notice::Lost(pid, err),
            };
            let _ = notices.send(notice);
            false
        });
    }
}
