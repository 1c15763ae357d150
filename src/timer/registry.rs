use log::{debug, trace, warn};

use super::{Entry, Scheduler, TimerCommands, TimerHandle, TimerItem};
use crate::error::Result;

/// Ordered collection of active timer items.
///
/// Owned by whoever drives the frame loop and passed around explicitly; in
/// the demo it lives inside [`GameContext`](crate::game::GameContext).
pub struct TimerRegistry {
    items: Vec<Entry>,
    paused: bool,
    next_id: u64,
}

impl Default for TimerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerRegistry {
    pub fn new() -> Self {
        TimerRegistry {
            items: Vec::new(),
            paused: false,
            next_id: 1,
        }
    }

    /// Advance every item by `dt` seconds, in registration order.
    ///
    /// Does nothing while paused. Items flagged during the pass are pruned
    /// at its end; items scheduled from callbacks are appended after pruning
    /// and first visited by the next call.
    pub fn update(&mut self, dt: f32) {
        if self.paused {
            return;
        }
        let dt = if dt.is_finite() && dt >= 0.0 {
            dt
        } else {
            warn!("TimerRegistry::update got dt={dt}, treating as 0");
            0.0
        };

        let mut commands = TimerCommands::new(self.next_id);
        for index in 0..self.items.len() {
            let entry = &mut self.items[index];
            if entry.item.is_pending_removal() {
                continue;
            }
            entry.item.update(dt, &mut commands);

            for handle in commands.take_cancelled() {
                self.mark_cancelled(handle);
            }
        }

        self.items.retain(|entry| {
            let keep = !entry.item.is_pending_removal();
            if !keep {
                trace!("Pruned {} timer {:?}", entry.item.kind(), entry.handle);
            }
            keep
        });

        self.next_id = commands.next_id();
        self.items.extend(
            commands
                .into_scheduled()
                .into_iter()
                .filter(|entry| !entry.item.is_pending_removal()),
        );
    }

    fn mark_cancelled(&mut self, handle: TimerHandle) {
        if let Some(entry) = self.items.iter_mut().find(|e| e.handle == handle) {
            if !entry.item.is_pending_removal() {
                debug!("Cancelled {} timer {:?}", entry.item.kind(), handle);
            }
            entry.item.mark_for_removal();
        }
    }

    /// Freeze every item; `update` becomes a no-op until [`resume`](Self::resume).
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Drop every item immediately and resume.
    pub fn clear(&mut self) {
        debug!("Clearing {} timers", self.items.len());
        self.items.clear();
        self.paused = false;
    }

    /// Items in the registry, including those flagged but not yet pruned.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether `handle` refers to an item that is registered and not flagged.
    pub fn is_active(&self, handle: TimerHandle) -> bool {
        self.get(handle)
            .is_some_and(|item| !item.is_pending_removal())
    }

    pub fn get(&self, handle: TimerHandle) -> Option<&TimerItem> {
        self.items
            .iter()
            .find(|e| e.handle == handle)
            .map(|e| &e.item)
    }
}

impl Scheduler for TimerRegistry {
    fn schedule(&mut self, item: impl Into<TimerItem>) -> Result<TimerHandle> {
        let item = item.into();
        item.validate()?;
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        debug!(
            "Scheduled {} timer {:?} ({}s)",
            item.kind(),
            handle,
            item.duration()
        );
        self.items.push(Entry { handle, item });
        Ok(handle)
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.mark_cancelled(handle);
    }
}
