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

//! Shutdown event notification.

use nix::{
    sys::signal::{kill, Signal},
    unistd::Pid,
};
use std::{fmt, sync::Arc, time::Duration};
use xc02_shared::reg;

use crate::{
    code::ListenerConfig,
    error::{Error, Result},
    timer::Alarm,
    transport::Bus,
};

/// Receiver of shutdown notifications.
///
/// Dropping the last reference unbinds the listener.
pub trait Listener: Send + Sync {
    /// Delivers one notification.
    fn deliver(&self);
}

/// Creates listeners for listener identities.
pub trait NotificationSink: Send + Sync {
    /// Binds a listener to `identity`.
    fn bind(&self, identity: u32) -> Result<Arc<dyn Listener>>;
}

/// Delivers notifications as POSIX signals to the own process.
#[derive(Debug, Default, Clone, Copy)]
pub struct SignalSink;

struct SignalListener(Signal);

impl Listener for SignalListener {
    fn deliver(&self) {
        if let Err(err) = kill(Pid::this(), self.0) {
            log::warn!("cannot send {}: {err}", self.0);
        }
    }
}

impl NotificationSink for SignalSink {
    fn bind(&self, identity: u32) -> Result<Arc<dyn Listener>> {
        let signal = i32::try_from(identity)
            .ok()
            .and_then(|nr| Signal::try_from(nr).ok())
            .ok_or(Error::ParameterRange(identity.into()))?;
        log::debug!("bound shutdown listener to {signal}");
        Ok(Arc::new(SignalListener(signal)))
    }
}

/// Callback invoked with the listener identity.
pub type Callback = Arc<dyn Fn(u32) + Send + Sync>;

/// Delivers notifications by calling a function.
#[derive(Clone)]
pub struct CallbackSink(Callback);

impl CallbackSink {
    /// Creates a sink that calls `f` with the listener identity.
    pub fn new(f: impl Fn(u32) + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }
}

impl fmt::Debug for CallbackSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackSink").finish_non_exhaustive()
    }
}

struct CallbackListener {
    identity: u32,
    callback: Callback,
}

impl Listener for CallbackListener {
    fn deliver(&self) {
        (self.callback)(self.identity)
    }
}

impl NotificationSink for CallbackSink {
    fn bind(&self, identity: u32) -> Result<Arc<dyn Listener>> {
        Ok(Arc::new(CallbackListener { identity, callback: self.0.clone() }))
    }
}

/// Polls the status register once and notifies the listener if a shutdown event is pending.
///
/// Returns whether a notification was delivered.
pub fn poll_shutdown(bus: &Bus, listener: &dyn Listener) -> Result<bool> {
    let status = bus.lock().read(reg::STATUS)?;
    if status & reg::STATUS_DOWN_EVT == 0 {
        return Ok(false);
    }
    log::debug!("shutdown event pending");
    listener.deliver();
    Ok(true)
}

/// Notifier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifierState {
    /// No listener registered.
    Idle,
    /// Listener registered and status polled periodically.
    Armed,
}

struct Registration {
    identity: u32,
    period: Duration,
    _listener: Arc<dyn Listener>,
}

/// Shutdown notifier.
///
/// Polls the status register while a listener is registered.
pub struct ShutdownNotifier {
    bus: Bus,
    alarm: Box<dyn Alarm>,
    sink: Arc<dyn NotificationSink>,
    registration: Option<Registration>,
}

impl fmt::Debug for ShutdownNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShutdownNotifier")
            .field("bus", &self.bus)
            .field("state", &self.state())
            .field("identity", &self.registration.as_ref().map(|r| r.identity))
            .finish()
    }
}

impl ShutdownNotifier {
    /// Creates an idle notifier.
    pub fn new(bus: Bus, alarm: Box<dyn Alarm>, sink: Arc<dyn NotificationSink>) -> Self {
        Self { bus, alarm, sink, registration: None }
    }

    /// Current state.
    pub fn state(&self) -> NotifierState {
        match self.registration {
            Some(_) => NotifierState::Armed,
            None => NotifierState::Idle,
        }
    }

    /// Realized poll period while armed.
    pub fn period(&self) -> Option<Duration> {
        self.registration.as_ref().map(|r| r.period)
    }

    /// Registers a listener and starts polling.
    ///
    /// Returns the realized poll period.
    pub fn register(&mut self, config: ListenerConfig) -> Result<Duration> {
        if self.registration.is_some() {
            return Err(Error::AlreadyRegistered);
        }
        if config.signal == 0 {
            return Err(Error::ParameterRange(0));
        }

        let listener = self.sink.bind(config.signal)?;
        let bus = self.bus.clone();
        let poll_listener = listener.clone();
        let handler = Box::new(move || {
            if let Err(err) = poll_shutdown(&bus, &*poll_listener) {
                log::warn!("shutdown poll failed: {err}");
            }
        });

        // On failure the handler and thus the listener binding are dropped here.
        let period = self.alarm.arm(Duration::from_millis(config.period_ms.into()), handler)?;

        log::info!("shutdown listener {} registered, polling every {period:?}", config.signal);
        self.registration = Some(Registration { identity: config.signal, period, _listener: listener });
        Ok(period)
    }

    /// Stops polling and releases the listener.
    pub fn clear(&mut self) -> Result<()> {
        let registration = self.registration.take().ok_or(Error::NotRegistered)?;
        self.alarm.cancel();
        log::info!("shutdown listener {} cleared", registration.identity);
        Ok(())
    }

    /// Stops polling and releases the listener if registered.
    pub fn shutdown(&mut self) {
        if self.registration.is_some() {
            let _ = self.clear();
        } else {
            self.alarm.cancel();
        }
    }
}

impl Drop for ShutdownNotifier {
    fn drop(&mut self) {
        self.shutdown();
    }
}
