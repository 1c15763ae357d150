//! Timer item variants.
//!
//! Each item tracks `elapsed` against `duration` and knows how to advance
//! itself by one frame. Items never remove themselves from the registry;
//! they set `pending_removal` and the registry prunes them at the end of the
//! pass. Once set, `pending_removal` is never cleared.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use smallvec::SmallVec;

use super::{TimerAction, TimerCallback, TimerCommands};
use crate::easing::{Easing, lerp_f32};
use crate::error::{Error, Result};

fn check_duration(what: &str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidArgument(format!(
            "{what} must be a positive number of seconds, got {value}"
        )))
    }
}

// ==================== REPEATING ====================

/// Runs an action once per elapsed interval.
///
/// At most one fire per update; the remainder past the interval carries over
/// to the next frame.
pub struct Repeating {
    pub(crate) elapsed: f32,
    pub(crate) duration: f32,
    action: TimerAction,
    pub(crate) remaining_fires: Option<u32>,
    pub(crate) on_finish: Option<TimerCallback>,
    pub(crate) pending_removal: bool,
}

impl Repeating {
    pub fn new(interval: f32, action: impl FnMut(&mut TimerCommands) + 'static) -> Self {
        Repeating {
            elapsed: 0.0,
            duration: interval,
            action: Box::new(action),
            remaining_fires: None,
            on_finish: None,
            pending_removal: false,
        }
    }

    /// Stop after `fires` runs of the action.
    pub fn with_limit(mut self, fires: u32) -> Self {
        self.remaining_fires = Some(fires);
        self
    }

    /// Callback run once after the last limited fire.
    pub fn on_finish(mut self, f: impl FnOnce(&mut TimerCommands) + 'static) -> Self {
        self.on_finish = Some(Box::new(f));
        self
    }

    /// Fires still allowed, `None` when unlimited.
    pub fn remaining_fires(&self) -> Option<u32> {
        self.remaining_fires
    }

    fn update(&mut self, dt: f32, cmds: &mut TimerCommands) {
        self.elapsed += dt;
        if self.elapsed < self.duration {
            return;
        }
        self.elapsed %= self.duration;
        (self.action)(cmds);

        if let Some(remaining) = self.remaining_fires.as_mut() {
            *remaining = remaining.saturating_sub(1);
            if *remaining == 0 {
                self.pending_removal = true;
                if let Some(finish) = self.on_finish.take() {
                    finish(cmds);
                }
            }
        }
    }
}

// ==================== DELAYED ====================

/// Runs its callback once when the delay has elapsed.
pub struct Delayed {
    pub(crate) elapsed: f32,
    pub(crate) duration: f32,
    pub(crate) on_finish: Option<TimerCallback>,
    pub(crate) pending_removal: bool,
}

impl Delayed {
    pub fn new(delay: f32, action: impl FnOnce(&mut TimerCommands) + 'static) -> Self {
        Delayed {
            elapsed: 0.0,
            duration: delay,
            on_finish: Some(Box::new(action)),
            pending_removal: false,
        }
    }

    fn update(&mut self, dt: f32, cmds: &mut TimerCommands) {
        self.elapsed += dt;
        if self.elapsed >= self.duration {
            self.pending_removal = true;
            if let Some(action) = self.on_finish.take() {
                action(cmds);
            }
        }
    }
}

// ==================== TWEEN ====================

/// Typed accessor pair for one tweened `f32`.
///
/// The getter is read exactly once, when the tween is created.
pub struct TweenField {
    getter: Box<dyn Fn() -> f32>,
    setter: Box<dyn FnMut(f32)>,
}

impl TweenField {
    pub fn new(getter: impl Fn() -> f32 + 'static, setter: impl FnMut(f32) + 'static) -> Self {
        TweenField {
            getter: Box::new(getter),
            setter: Box::new(setter),
        }
    }

    /// Tween a shared cell.
    pub fn cell(cell: Rc<Cell<f32>>) -> Self {
        let write = cell.clone();
        TweenField::new(move || cell.get(), move |v| write.set(v))
    }

    /// Tween one field of a shared object, selected by `project`.
    ///
    /// ```
    /// use std::{cell::RefCell, rc::Rc};
    /// use stepframe::timer::TweenField;
    ///
    /// struct Banner { y: f32 }
    /// let banner = Rc::new(RefCell::new(Banner { y: -20.0 }));
    /// let field = TweenField::of(banner.clone(), |b| &mut b.y);
    /// # let _ = field;
    /// ```
    pub fn of<T: 'static>(target: Rc<RefCell<T>>, project: fn(&mut T) -> &mut f32) -> Self {
        let write = target.clone();
        TweenField::new(
            move || *project(&mut target.borrow_mut()),
            move |v| *project(&mut write.borrow_mut()) = v,
        )
    }

    fn get(&self) -> f32 {
        (self.getter)()
    }

    fn set(&mut self, value: f32) {
        (self.setter)(value)
    }
}

/// Ordered list of `(field, final value)` targets for a tween.
#[derive(Default)]
pub struct TweenPlan {
    targets: SmallVec<[(TweenField, f32); 2]>,
}

impl TweenPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field that should end at `final_value`.
    pub fn field(mut self, field: TweenField, final_value: f32) -> Self {
        self.targets.push((field, final_value));
        self
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

struct TweenStep {
    field: TweenField,
    initial: f32,
    final_value: f32,
}

/// Interpolates a set of fields from their values at creation time.
pub struct Tween {
    pub(crate) elapsed: f32,
    pub(crate) duration: f32,
    easing: Easing,
    steps: SmallVec<[TweenStep; 2]>,
    pub(crate) on_finish: Option<TimerCallback>,
    pub(crate) pending_removal: bool,
}

impl Tween {
    /// Build a tween, snapshotting every field's current value.
    pub fn new(duration: f32, plan: TweenPlan) -> Self {
        let steps = plan
            .targets
            .into_iter()
            .map(|(field, final_value)| {
                let initial = field.get();
                TweenStep {
                    field,
                    initial,
                    final_value,
                }
            })
            .collect();
        Tween {
            elapsed: 0.0,
            duration,
            easing: Easing::Linear,
            steps,
            on_finish: None,
            pending_removal: false,
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn on_finish(mut self, f: impl FnOnce(&mut TimerCommands) + 'static) -> Self {
        self.on_finish = Some(Box::new(f));
        self
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    /// Initial values captured at creation, in plan order.
    pub fn initial_values(&self) -> Vec<f32> {
        self.steps.iter().map(|s| s.initial).collect()
    }

    fn update(&mut self, dt: f32, cmds: &mut TimerCommands) {
        self.elapsed += dt;
        if self.elapsed >= self.duration {
            // Finals first so on_finish observes exact targets.
            for step in self.steps.iter_mut() {
                step.field.set(step.final_value);
            }
            self.pending_removal = true;
            if let Some(finish) = self.on_finish.take() {
                finish(cmds);
            }
            return;
        }

        let progress = self.easing.apply(self.elapsed / self.duration);
        for step in self.steps.iter_mut() {
            step.field.set(lerp_f32(step.initial, step.final_value, progress));
        }
    }
}

// ==================== DISPATCH ====================

/// Any schedulable item.
pub enum TimerItem {
    Repeating(Repeating),
    Delayed(Delayed),
    Tween(Tween),
}

impl From<Repeating> for TimerItem {
    fn from(item: Repeating) -> Self {
        TimerItem::Repeating(item)
    }
}

impl From<Delayed> for TimerItem {
    fn from(item: Delayed) -> Self {
        TimerItem::Delayed(item)
    }
}

impl From<Tween> for TimerItem {
    fn from(item: Tween) -> Self {
        TimerItem::Tween(item)
    }
}

impl TimerItem {
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            TimerItem::Repeating(_) => "repeating",
            TimerItem::Delayed(_) => "delayed",
            TimerItem::Tween(_) => "tween",
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        match self {
            TimerItem::Repeating(r) => {
                check_duration("interval", r.duration)?;
                if r.remaining_fires == Some(0) {
                    return Err(Error::InvalidArgument(
                        "fire limit must be at least 1".to_string(),
                    ));
                }
                Ok(())
            }
            TimerItem::Delayed(d) => check_duration("delay", d.duration),
            TimerItem::Tween(t) => check_duration("tween duration", t.duration),
        }
    }

    /// Seconds accumulated toward the next fire or completion.
    pub fn elapsed(&self) -> f32 {
        match self {
            TimerItem::Repeating(r) => r.elapsed,
            TimerItem::Delayed(d) => d.elapsed,
            TimerItem::Tween(t) => t.elapsed,
        }
    }

    pub fn duration(&self) -> f32 {
        match self {
            TimerItem::Repeating(r) => r.duration,
            TimerItem::Delayed(d) => d.duration,
            TimerItem::Tween(t) => t.duration,
        }
    }

    pub fn is_pending_removal(&self) -> bool {
        match self {
            TimerItem::Repeating(r) => r.pending_removal,
            TimerItem::Delayed(d) => d.pending_removal,
            TimerItem::Tween(t) => t.pending_removal,
        }
    }

    /// Flag for removal. Completion callbacks are dropped unrun.
    pub(crate) fn mark_for_removal(&mut self) {
        match self {
            TimerItem::Repeating(r) => r.pending_removal = true,
            TimerItem::Delayed(d) => d.pending_removal = true,
            TimerItem::Tween(t) => t.pending_removal = true,
        }
    }

    pub(crate) fn update(&mut self, dt: f32, cmds: &mut TimerCommands) {
        match self {
            TimerItem::Repeating(r) => r.update(dt, cmds),
            TimerItem::Delayed(d) => d.update(dt, cmds),
            TimerItem::Tween(t) => t.update(dt, cmds),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmds() -> TimerCommands {
        TimerCommands::new(1)
    }

    #[test]
    fn test_repeating_carries_remainder() {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let mut r = Repeating::new(0.5, move |_| c.set(c.get() + 1));
        let mut cmds = cmds();
        r.update(0.75, &mut cmds);
        assert_eq!(count.get(), 1);
        assert_eq!(r.elapsed, 0.25);
        r.update(0.25, &mut cmds);
        assert_eq!(count.get(), 2);
        assert_eq!(r.elapsed, 0.0);
    }

    #[test]
    fn test_repeating_fires_once_per_update_even_for_large_dt() {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let mut r = Repeating::new(0.25, move |_| c.set(c.get() + 1));
        let mut cmds = cmds();
        r.update(1.0, &mut cmds);
        assert_eq!(count.get(), 1);
        assert_eq!(r.elapsed, 0.0);
    }

    #[test]
    fn test_repeating_limit_marks_removal_and_finishes_once() {
        let finished = Rc::new(Cell::new(0));
        let f = finished.clone();
        let mut r = Repeating::new(1.0, |_| {})
            .with_limit(2)
            .on_finish(move |_| f.set(f.get() + 1));
        let mut cmds = cmds();
        r.update(1.0, &mut cmds);
        assert!(!r.pending_removal);
        r.update(1.0, &mut cmds);
        assert!(r.pending_removal);
        assert_eq!(finished.get(), 1);
        assert!(r.on_finish.is_none());
    }

    #[test]
    fn test_delayed_fires_at_threshold() {
        let fired = Rc::new(Cell::new(false));
        let f = fired.clone();
        let mut d = Delayed::new(0.5, move |_| f.set(true));
        let mut cmds = cmds();
        d.update(0.25, &mut cmds);
        assert!(!fired.get());
        d.update(0.25, &mut cmds);
        assert!(fired.get());
        assert!(d.pending_removal);
    }

    #[test]
    fn test_tween_snapshots_initial_value_once() {
        let x = Rc::new(Cell::new(2.0_f32));
        let mut tween = Tween::new(1.0, TweenPlan::new().field(TweenField::cell(x.clone()), 4.0));
        assert_eq!(tween.initial_values(), vec![2.0]);

        // External writes between frames do not move the start point.
        x.set(100.0);
        tween.update(0.5, &mut cmds());
        assert_eq!(x.get(), 3.0);
    }

    #[test]
    fn test_tween_of_projects_struct_field() {
        struct Pos {
            x: f32,
            y: f32,
        }
        let pos = Rc::new(RefCell::new(Pos { x: 0.0, y: 8.0 }));
        let plan = TweenPlan::new()
            .field(TweenField::of(pos.clone(), |p| &mut p.x), 10.0)
            .field(TweenField::of(pos.clone(), |p| &mut p.y), 0.0);
        let mut tween = Tween::new(2.0, plan);
        tween.update(1.0, &mut cmds());
        assert_eq!(pos.borrow().x, 5.0);
        assert_eq!(pos.borrow().y, 4.0);
        tween.update(1.0, &mut cmds());
        assert_eq!(pos.borrow().x, 10.0);
        assert_eq!(pos.borrow().y, 0.0);
    }

    #[test]
    fn test_tween_uses_easing() {
        let x = Rc::new(Cell::new(0.0_f32));
        let mut tween = Tween::new(1.0, TweenPlan::new().field(TweenField::cell(x.clone()), 1.0))
            .with_easing(Easing::InQuad);
        tween.update(0.5, &mut cmds());
        assert_eq!(x.get(), 0.25);
    }

    #[test]
    fn test_tween_on_finish_sees_exact_final() {
        let x = Rc::new(Cell::new(0.1_f32));
        let seen = Rc::new(Cell::new(0.0_f32));
        let (xr, s) = (x.clone(), seen.clone());
        let mut tween = Tween::new(0.3, TweenPlan::new().field(TweenField::cell(x.clone()), 0.7))
            .with_easing(Easing::OutElastic)
            .on_finish(move |_| s.set(xr.get()));
        let mut c = cmds();
        for _ in 0..3 {
            tween.update(0.1, &mut c);
        }
        // 0.1 * 3 may land a hair short of 0.3, one more step always completes
        tween.update(0.1, &mut c);
        assert_eq!(x.get(), 0.7);
        assert_eq!(seen.get(), 0.7);
    }

    #[test]
    fn test_validate_rejects_bad_parameters() {
        assert!(TimerItem::from(Delayed::new(0.0, |_| {})).validate().is_err());
        assert!(TimerItem::from(Delayed::new(-1.0, |_| {})).validate().is_err());
        assert!(TimerItem::from(Delayed::new(f32::NAN, |_| {})).validate().is_err());
        assert!(
            TimerItem::from(Repeating::new(1.0, |_| {}).with_limit(0))
                .validate()
                .is_err()
        );
        assert!(TimerItem::from(Tween::new(0.0, TweenPlan::new())).validate().is_err());
        assert!(TimerItem::from(Repeating::new(0.1, |_| {})).validate().is_ok());
    }
}
