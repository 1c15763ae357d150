//! Timer registry scenarios driven through the public API only.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use stepframe::easing::Easing;
use stepframe::error::Error;
use stepframe::timer::{
    Repeating, Scheduler, TimerRegistry, Tween, TweenField, TweenPlan, callback,
};

fn counter() -> (Rc<Cell<u32>>, Rc<Cell<u32>>) {
    let c = Rc::new(Cell::new(0));
    (c.clone(), c)
}

// ==================== Repeating ====================

#[test]
fn test_repeating_with_limit_fires_then_finishes() {
    let mut timers = TimerRegistry::new();
    let (fires, f) = counter();
    let (finished, d) = counter();
    let handle = timers
        .schedule_repeating(
            0.1,
            move |_| f.set(f.get() + 1),
            Some(5),
            Some(callback(move |_| d.set(d.get() + 1))),
        )
        .unwrap();

    for i in 1..=5 {
        timers.update(0.1);
        assert_eq!(fires.get(), i);
        assert_eq!(finished.get(), if i == 5 { 1 } else { 0 });
    }
    assert!(timers.get(handle).is_none());
    assert!(timers.is_empty());
}

#[test]
fn test_repeating_exact_multiples_leave_no_remainder() {
    let mut timers = TimerRegistry::new();
    let (fires, f) = counter();
    let handle = timers
        .schedule_repeating(0.25, move |_| f.set(f.get() + 1), None, None)
        .unwrap();
    for _ in 0..8 {
        timers.update(0.125);
    }
    assert_eq!(fires.get(), 4);
    assert_eq!(timers.get(handle).map(|item| item.elapsed()), Some(0.0));
}

#[test]
fn test_limit_builder_matches_scheduler_shortcut() {
    let mut timers = TimerRegistry::new();
    let (fires, f) = counter();
    timers
        .schedule(Repeating::new(0.5, move |_| f.set(f.get() + 1)).with_limit(2))
        .unwrap();
    for _ in 0..6 {
        timers.update(0.5);
    }
    assert_eq!(fires.get(), 2);
}

// ==================== Delayed ====================

#[test]
fn test_delayed_fires_once_on_crossing() {
    let mut timers = TimerRegistry::new();
    let (fires, f) = counter();
    timers
        .schedule_delayed(0.3, move |_| f.set(f.get() + 1))
        .unwrap();
    timers.update(0.2);
    assert_eq!(fires.get(), 0);
    timers.update(0.2);
    assert_eq!(fires.get(), 1);
    timers.update(1.0);
    timers.update(1.0);
    assert_eq!(fires.get(), 1);
}

// ==================== Tween ====================

#[derive(Debug, Default)]
struct Sprite {
    x: f32,
    alpha: f32,
}

#[test]
fn test_linear_tween_lands_exactly_on_target() {
    let mut timers = TimerRegistry::new();
    let sprite = Rc::new(RefCell::new(Sprite::default()));
    let (finished, d) = counter();
    let plan = TweenPlan::new().field(TweenField::of(sprite.clone(), |s| &mut s.x), 10.0);
    timers
        .schedule_tween(1.0, plan, "linear", Some(callback(move |_| d.set(d.get() + 1))))
        .unwrap();

    timers.update(0.5);
    assert_eq!(sprite.borrow().x, 5.0);
    assert_eq!(finished.get(), 0);
    timers.update(0.5);
    assert_eq!(sprite.borrow().x, 10.0);
    assert_eq!(finished.get(), 1);
    timers.update(0.5);
    assert_eq!(finished.get(), 1);
}

#[test]
fn test_tween_moves_several_fields_with_one_curve() {
    let mut timers = TimerRegistry::new();
    let sprite = Rc::new(RefCell::new(Sprite { x: 100.0, alpha: 1.0 }));
    let plan = TweenPlan::new()
        .field(TweenField::of(sprite.clone(), |s| &mut s.x), 0.0)
        .field(TweenField::of(sprite.clone(), |s| &mut s.alpha), 0.0);
    timers
        .schedule(Tween::new(0.7, plan).with_easing(Easing::InOutCubic))
        .unwrap();
    // one spare step in case the f32 sum lands just short of 0.7
    for _ in 0..8 {
        timers.update(0.1);
    }
    let s = sprite.borrow();
    assert_eq!((s.x, s.alpha), (0.0, 0.0));
}

#[test]
fn test_unknown_ease_name_is_rejected() {
    let mut timers = TimerRegistry::new();
    let value = Rc::new(Cell::new(0.0));
    let plan = TweenPlan::new().field(TweenField::cell(value), 1.0);
    assert_eq!(
        timers.schedule_tween(1.0, plan, "wobbly", None),
        Err(Error::InvalidEaseName("wobbly".into()))
    );
    assert!(timers.is_empty());
}

// ==================== Re-entrancy ====================

#[test]
fn test_chained_delays_run_one_pass_apart() {
    let mut timers = TimerRegistry::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    let l = log.clone();
    timers
        .schedule_delayed(0.1, move |cmds| {
            l.borrow_mut().push("first");
            let l = l.clone();
            cmds.schedule_delayed(0.1, move |_| l.borrow_mut().push("second"))
                .unwrap();
        })
        .unwrap();
    timers.update(0.1);
    assert_eq!(*log.borrow(), vec!["first"]);
    assert_eq!(timers.len(), 1);
    timers.update(0.1);
    assert_eq!(*log.borrow(), vec!["first", "second"]);
    assert!(timers.is_empty());
}

#[test]
fn test_callback_cancel_stops_later_item() {
    let mut timers = TimerRegistry::new();
    let (fires, f) = counter();
    let victim = Rc::new(Cell::new(None));
    let v = victim.clone();
    timers
        .schedule_delayed(0.1, move |cmds| {
            if let Some(handle) = v.get() {
                cmds.cancel(handle);
            }
        })
        .unwrap();
    let handle = timers
        .schedule_delayed(0.1, move |_| f.set(f.get() + 1))
        .unwrap();
    victim.set(Some(handle));
    timers.update(0.1);
    assert_eq!(fires.get(), 0);
    assert!(timers.is_empty());
}
