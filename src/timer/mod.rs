//! Frame-stepped timer and tween scheduling.
//!
//! A [`TimerRegistry`] owns an ordered list of deferred actions and advances
//! them once per frame with [`TimerRegistry::update`]. Three kinds of items
//! exist:
//!
//! - [`Repeating`] – runs an action every `interval` seconds, optionally a
//!   limited number of times, then runs a completion callback.
//! - [`Delayed`] – runs a callback once after `delay` seconds.
//! - [`Tween`] – interpolates `f32` fields from their current value to a
//!   target over `duration` seconds using an [`Easing`](crate::easing::Easing)
//!   curve, then runs a completion callback.
//!
//! # Re-entrancy
//!
//! Callbacks receive a [`TimerCommands`] buffer instead of the registry
//! itself. Items scheduled through it get a handle immediately but are only
//! visited from the *next* `update`. Cancels issued through it are applied
//! as soon as the calling item returns, so a later item in the same pass
//! that was cancelled does not fire.
//!
//! # Example
//!
//! ```
//! use std::{cell::Cell, rc::Rc};
//! use stepframe::timer::{Scheduler, TimerRegistry, callback};
//!
//! let mut timers = TimerRegistry::new();
//! let ticks = Rc::new(Cell::new(0));
//! let done = Rc::new(Cell::new(false));
//! let (t, d) = (ticks.clone(), done.clone());
//! timers
//!     .schedule_repeating(0.25, move |_| t.set(t.get() + 1), Some(2), Some(callback(move |_| d.set(true))))
//!     .unwrap();
//! for _ in 0..2 {
//!     timers.update(0.25);
//! }
//! assert_eq!(ticks.get(), 2);
//! assert!(done.get());
//! assert!(timers.is_empty());
//! ```
//!
//! # Related
//!
//! - [`crate::easing`] – curves used by tweens
//! - [`crate::systems::timers::update_timers`] – ECS system driving the registry

mod item;
mod registry;

pub use item::{Delayed, Repeating, TimerItem, Tween, TweenField, TweenPlan};
pub use registry::TimerRegistry;

use log::debug;

use crate::easing::Easing;
use crate::error::Result;

/// Opaque reference to a scheduled item, used for cancellation.
///
/// Handles are never reused within one registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Action run on every interval of a [`Repeating`] item.
pub type TimerAction = Box<dyn FnMut(&mut TimerCommands)>;
/// Callback run at most once when an item completes.
pub type TimerCallback = Box<dyn FnOnce(&mut TimerCommands)>;

/// Box a completion callback.
///
/// Writing `Some(Box::new(|cmds| ...))` directly leaves the closure's argument
/// lifetime uninferred; passing it through here fixes the signature.
pub fn callback(f: impl FnOnce(&mut TimerCommands) + 'static) -> TimerCallback {
    Box::new(f)
}

/// A registered item together with its handle.
pub(crate) struct Entry {
    pub(crate) handle: TimerHandle,
    pub(crate) item: TimerItem,
}

/// Deferred scheduling and cancellation issued from inside a callback.
///
/// Handed to every action and completion callback while the registry is
/// iterating. The registry drains it after each item.
pub struct TimerCommands {
    next_id: u64,
    scheduled: Vec<Entry>,
    cancelled: Vec<TimerHandle>,
}

impl TimerCommands {
    pub(crate) fn new(next_id: u64) -> Self {
        TimerCommands {
            next_id,
            scheduled: Vec::new(),
            cancelled: Vec::new(),
        }
    }

    pub(crate) fn next_id(&self) -> u64 {
        self.next_id
    }

    pub(crate) fn take_cancelled(&mut self) -> Vec<TimerHandle> {
        std::mem::take(&mut self.cancelled)
    }

    pub(crate) fn into_scheduled(self) -> Vec<Entry> {
        self.scheduled
    }

    /// Number of items waiting to join the registry after this pass.
    pub fn pending(&self) -> usize {
        self.scheduled.len()
    }
}

impl Scheduler for TimerCommands {
    fn schedule(&mut self, item: impl Into<TimerItem>) -> Result<TimerHandle> {
        let item = item.into();
        item.validate()?;
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        debug!("Deferred {} timer {:?} until next update", item.kind(), handle);
        self.scheduled.push(Entry { handle, item });
        Ok(handle)
    }

    fn cancel(&mut self, handle: TimerHandle) {
        // Items scheduled in this same pass never made it to the registry.
        if let Some(entry) = self.scheduled.iter_mut().find(|e| e.handle == handle) {
            entry.item.mark_for_removal();
            return;
        }
        if !self.cancelled.contains(&handle) {
            self.cancelled.push(handle);
        }
    }
}

/// Scheduling operations shared by [`TimerRegistry`] and [`TimerCommands`].
pub trait Scheduler {
    /// Queue a pre-built item.
    ///
    /// Fails with [`Error::InvalidArgument`](crate::error::Error::InvalidArgument)
    /// if its duration is not a positive finite number or its fire limit is zero.
    fn schedule(&mut self, item: impl Into<TimerItem>) -> Result<TimerHandle>;

    /// Mark an item for removal without running its completion callback.
    ///
    /// Unknown or already removed handles are ignored.
    fn cancel(&mut self, handle: TimerHandle);

    /// Run `action` every `interval` seconds.
    ///
    /// With `fire_limit = Some(n)` the item removes itself after the `n`th
    /// fire and then runs `on_finish`.
    fn schedule_repeating(
        &mut self,
        interval: f32,
        action: impl FnMut(&mut TimerCommands) + 'static,
        fire_limit: Option<u32>,
        on_finish: Option<TimerCallback>,
    ) -> Result<TimerHandle> {
        let mut item = Repeating::new(interval, action);
        item.remaining_fires = fire_limit;
        item.on_finish = on_finish;
        self.schedule(item)
    }

    /// Run `action` once, `delay` seconds from now.
    fn schedule_delayed(
        &mut self,
        delay: f32,
        action: impl FnOnce(&mut TimerCommands) + 'static,
    ) -> Result<TimerHandle> {
        self.schedule(Delayed::new(delay, action))
    }

    /// Interpolate every field in `plan` over `duration` seconds.
    ///
    /// Fails with [`Error::InvalidEaseName`](crate::error::Error::InvalidEaseName)
    /// if `ease_name` is not a known curve.
    fn schedule_tween(
        &mut self,
        duration: f32,
        plan: TweenPlan,
        ease_name: &str,
        on_finish: Option<TimerCallback>,
    ) -> Result<TimerHandle> {
        let easing: Easing = ease_name.parse()?;
        let mut tween = Tween::new(duration, plan).with_easing(easing);
        tween.on_finish = on_finish;
        self.schedule(tween)
    }
}
