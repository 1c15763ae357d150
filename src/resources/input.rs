//! Input bindings and dispatch.
//!
//! [`InputBindings`] map device events to abstract input ids per device:
//! keys, mouse buttons, wheel directions and unit mouse motions. The
//! [`InputDispatcher`] owns the bindings plus an ordered listener list and is
//! the only place raw input becomes `(input_id, InputData)`.
//!
//! The dispatcher is an explicit, world-owned object (a non-send resource in
//! the demo) rather than a process-wide singleton.

use bevy_ecs::prelude::Resource;
use log::{debug, trace};
use rustc_hash::FxHashMap;

use crate::events::input::{
    InputData, InputEvent, Key, KeyboardData, MouseClickData, MouseMotionData, MouseWheelData,
    RawInput,
};

/// Per-device maps from raw identifiers to input ids.
#[derive(Debug, Clone, Default)]
pub struct InputBindings {
    keyboard: FxHashMap<Key, String>,
    mouse_click: FxHashMap<u8, String>,
    mouse_wheel: FxHashMap<(i32, i32), String>,
    mouse_motion: FxHashMap<(i32, i32), String>,
}

impl InputBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind_key(&mut self, key: Key, input_id: impl Into<String>) -> &mut Self {
        self.keyboard.insert(key, input_id.into());
        self
    }

    pub fn bind_mouse_click(&mut self, button: u8, input_id: impl Into<String>) -> &mut Self {
        self.mouse_click.insert(button, input_id.into());
        self
    }

    pub fn bind_mouse_wheel(&mut self, direction: (i32, i32), input_id: impl Into<String>) -> &mut Self {
        self.mouse_wheel.insert(direction, input_id.into());
        self
    }

    pub fn bind_mouse_motion(&mut self, rel: (i32, i32), input_id: impl Into<String>) -> &mut Self {
        self.mouse_motion.insert(rel, input_id.into());
        self
    }

    pub fn key_binding(&self, key: Key) -> Option<&str> {
        self.keyboard.get(&key).map(String::as_str)
    }

    /// Translate a raw event; `None` when the event is not bound.
    pub fn translate(&self, raw: &RawInput) -> Option<InputEvent> {
        let (id, data) = match *raw {
            RawInput::KeyDown {
                key,
                modifiers,
                unicode,
            } => (
                self.keyboard.get(&key)?,
                InputData::Keyboard(KeyboardData {
                    pressed: true,
                    released: false,
                    modifiers,
                    unicode,
                }),
            ),
            RawInput::KeyUp {
                key,
                modifiers,
                unicode,
            } => (
                self.keyboard.get(&key)?,
                InputData::Keyboard(KeyboardData {
                    pressed: false,
                    released: true,
                    modifiers,
                    unicode,
                }),
            ),
            RawInput::MouseButtonDown { button, position } => (
                self.mouse_click.get(&button)?,
                InputData::MouseClick(MouseClickData {
                    pressed: true,
                    released: false,
                    button,
                    position,
                }),
            ),
            RawInput::MouseButtonUp { button, position } => (
                self.mouse_click.get(&button)?,
                InputData::MouseClick(MouseClickData {
                    pressed: false,
                    released: true,
                    button,
                    position,
                }),
            ),
            RawInput::MouseWheel { x, y, flipped } => (
                self.mouse_wheel.get(&(x, y))?,
                InputData::MouseWheel(MouseWheelData { flipped }),
            ),
            RawInput::MouseMotion {
                position,
                rel,
                buttons,
            } => (
                self.mouse_motion.get(&rel)?,
                InputData::MouseMotion(MouseMotionData { position, buttons }),
            ),
        };
        Some(InputEvent {
            input_id: id.clone(),
            data,
        })
    }
}

/// Identifies a registered listener for later removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&str, &InputData)>;

/// Translates raw input and notifies listeners in registration order.
#[derive(Default)]
pub struct InputDispatcher {
    bindings: InputBindings,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
}

impl InputDispatcher {
    pub fn new(bindings: InputBindings) -> Self {
        InputDispatcher {
            bindings,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    pub fn bindings(&self) -> &InputBindings {
        &self.bindings
    }

    pub fn bindings_mut(&mut self) -> &mut InputBindings {
        &mut self.bindings
    }

    pub fn register_listener(&mut self, listener: impl FnMut(&str, &InputData) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        debug!("Registered input listener {:?}", id);
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unregister_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        before != self.listeners.len()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Translate `raw` and notify every listener. Unbound events are dropped.
    pub fn handle_input(&mut self, raw: &RawInput) -> Option<InputEvent> {
        let Some(event) = self.bindings.translate(raw) else {
            trace!("Unbound input {:?}", raw);
            return None;
        };
        for (_, listener) in self.listeners.iter_mut() {
            listener(event.input_id.as_str(), &event.data);
        }
        Some(event)
    }
}

/// Raw events waiting for the next `dispatch_input` run.
///
/// Filled by the platform layer (or a script) before the frame's schedule.
#[derive(Resource, Debug, Default, Clone)]
pub struct RawInputQueue {
    events: Vec<RawInput>,
}

impl RawInputQueue {
    pub fn push(&mut self, event: RawInput) {
        self.events.push(event);
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, RawInput> {
        self.events.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::input::{MOUSE_BUTTON_1, MOUSE_WHEEL_UP};
    use crate::math::Vec2;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn bindings() -> InputBindings {
        let mut b = InputBindings::new();
        b.bind_key(Key::Left, "left")
            .bind_mouse_click(MOUSE_BUTTON_1, "fire")
            .bind_mouse_wheel(MOUSE_WHEEL_UP, "zoom_in")
            .bind_mouse_motion((1, 0), "look_right");
        b
    }

    #[test]
    fn test_translate_keyboard() {
        let b = bindings();
        let ev = b.translate(&RawInput::key_down(Key::Left)).unwrap();
        assert_eq!(ev.input_id, "left");
        assert!(ev.data.is_pressed());
        let ev = b.translate(&RawInput::key_up(Key::Left)).unwrap();
        assert!(ev.data.is_released());
        assert!(b.translate(&RawInput::key_down(Key::Right)).is_none());
    }

    #[test]
    fn test_translate_mouse_devices() {
        let b = bindings();
        let click = b
            .translate(&RawInput::MouseButtonDown {
                button: 1,
                position: Vec2::new(3.0, 4.0),
            })
            .unwrap();
        assert_eq!(click.input_id, "fire");
        assert_eq!(
            click.data,
            InputData::MouseClick(MouseClickData {
                pressed: true,
                released: false,
                button: 1,
                position: Vec2::new(3.0, 4.0),
            })
        );

        let wheel = b
            .translate(&RawInput::MouseWheel {
                x: 0,
                y: -1,
                flipped: true,
            })
            .unwrap();
        assert_eq!(wheel.input_id, "zoom_in");
        assert_eq!(wheel.data, InputData::MouseWheel(MouseWheelData { flipped: true }));

        let motion = b.translate(&RawInput::MouseMotion {
            position: Vec2::ZERO,
            rel: (1, 0),
            buttons: [false; 3],
        });
        assert_eq!(motion.map(|e| e.input_id), Some("look_right".to_string()));

        // Only the exact relative motion is bound.
        let fast = b.translate(&RawInput::MouseMotion {
            position: Vec2::ZERO,
            rel: (5, 0),
            buttons: [false; 3],
        });
        assert!(fast.is_none());
    }

    #[test]
    fn test_listeners_notified_in_registration_order() {
        let mut dispatcher = InputDispatcher::new(bindings());
        let log = Rc::new(RefCell::new(Vec::new()));
        for name in ["first", "second", "third"] {
            let log = log.clone();
            dispatcher.register_listener(move |id, _| log.borrow_mut().push(format!("{name}:{id}")));
        }
        dispatcher.handle_input(&RawInput::key_down(Key::Left));
        assert_eq!(*log.borrow(), vec!["first:left", "second:left", "third:left"]);
    }

    #[test]
    fn test_unregister_listener() {
        let mut dispatcher = InputDispatcher::new(bindings());
        let hits = Rc::new(RefCell::new(0));
        let h = hits.clone();
        let id = dispatcher.register_listener(move |_, _| *h.borrow_mut() += 1);
        dispatcher.handle_input(&RawInput::key_down(Key::Left));
        assert!(dispatcher.unregister_listener(id));
        assert!(!dispatcher.unregister_listener(id));
        dispatcher.handle_input(&RawInput::key_down(Key::Left));
        assert_eq!(*hits.borrow(), 1);
        assert_eq!(dispatcher.listener_count(), 0);
    }

    #[test]
    fn test_unbound_input_skips_listeners() {
        let mut dispatcher = InputDispatcher::new(bindings());
        let hits = Rc::new(RefCell::new(0));
        let h = hits.clone();
        dispatcher.register_listener(move |_, _| *h.borrow_mut() += 1);
        assert!(dispatcher.handle_input(&RawInput::key_down(Key::Space)).is_none());
        assert_eq!(*hits.borrow(), 0);
    }

    #[test]
    fn test_raw_queue_drains_in_order() {
        let mut q = RawInputQueue::default();
        q.push(RawInput::key_down(Key::Up));
        q.push(RawInput::key_up(Key::Up));
        let drained: Vec<_> = q.drain().collect();
        assert_eq!(drained.len(), 2);
        assert!(q.is_empty());
    }
}
