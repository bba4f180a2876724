//
// XC02 board controller driver
// Copyright (C) 2022 Sebastian Urban <surban@surban.net>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.
//

//! Periodic alarm timers.

use parking_lot::{Condvar, Mutex, MutexGuard};
use std::{
    sync::Arc,
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use crate::error::{Error, Result};

/// Alarm callback.
pub type AlarmHandler = Box<dyn FnMut() + Send>;

/// Periodic alarm.
///
/// Dropping the alarm destroys it and implies [`cancel`](Alarm::cancel).
pub trait Alarm: Send {
    /// Arms the alarm to call `handler` every `period`.
    ///
    /// Replaces a previously armed handler.
    /// Returns the period actually realized.
    fn arm(&mut self, period: Duration, handler: AlarmHandler) -> Result<Duration>;

    /// Cancels the alarm.
    ///
    /// Waits for a running handler to finish.
    /// No handler invocation starts after this returns.
    fn cancel(&mut self);
}

struct Worker {
    stop: Arc<(Mutex<bool>, Condvar)>,
    thread: JoinHandle<()>,
}

/// Alarm running its handler on a dedicated thread.
pub struct ThreadAlarm {
    name: String,
    worker: Option<Worker>,
}

impl ThreadAlarm {
    /// Timer resolution.
    pub const RESOLUTION: Duration = Duration::from_millis(1);

    /// Creates a new, unarmed alarm whose thread will be called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), worker: None }
    }

    fn run(period: Duration, mut handler: AlarmHandler, stop: Arc<(Mutex<bool>, Condvar)>) {
        let (lock, cond) = &*stop;
        let mut next = Instant::now() + period;
        let mut stopped = lock.lock();
        loop {
            while !*stopped {
                if cond.wait_until(&mut stopped, next).timed_out() {
                    break;
                }
            }
            if *stopped {
                break;
            }

            MutexGuard::unlocked(&mut stopped, || handler());

            // Skip periods missed while the handler was running.
            next += period;
            let now = Instant::now();
            while next <= now {
                next += period;
            }
        }
    }
}

impl Alarm for ThreadAlarm {
    fn arm(&mut self, period: Duration, handler: AlarmHandler) -> Result<Duration> {
        if period < Self::RESOLUTION {
            return Err(Error::ParameterRange(period.as_millis() as i64));
        }
        self.cancel();

        let realized = Duration::from_millis(period.as_millis() as u64);
        let stop = Arc::new((Mutex::new(false), Condvar::new()));
        let stop_thread = stop.clone();
        let thread = thread::Builder::new()
            .name(self.name.clone())
            .spawn(move || Self::run(realized, handler, stop_thread))
            .map_err(|err| Error::ResourceExhausted(format!("cannot spawn alarm thread: {err}")))?;

        log::debug!("alarm {} armed with period {realized:?}", self.name);
        self.worker = Some(Worker { stop, thread });
        Ok(realized)
    }

    fn cancel(&mut self) {
        let Some(Worker { stop, thread }) = self.worker.take() else { return };

        let (lock, cond) = &*stop;
        *lock.lock() = true;
        cond.notify_all();

        if thread.thread().id() == thread::current().id() {
            // Cancelled from within the handler, the thread exits after it returns.
            return;
        }
        if thread.join().is_err() {
            log::error!("alarm {} handler panicked", self.name);
        }
        log::debug!("alarm {} cancelled", self.name);
    }
}

impl Drop for ThreadAlarm {
    fn drop(&mut self) {
        self.cancel();
    }
}
