use log::{debug, warn};
use serde_json::Value;

use super::State;
use crate::error::{Error, Result};
use crate::events::input::InputData;
use crate::resources::canvas::Canvas;

/// Stack of states; the most recently pushed one is on top.
///
/// Only the top receives input and updates. Rendering walks the whole stack
/// bottom to top so overlays draw over what is beneath them.
pub struct StateStack<C> {
    states: Vec<Box<dyn State<C>>>,
}

impl<C> Default for StateStack<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> StateStack<C> {
    pub fn new() -> Self {
        StateStack { states: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Push `state` and enter it.
    ///
    /// The state stays on the stack even when `enter` fails.
    pub fn push(&mut self, state: Box<dyn State<C>>, ctx: &mut C, params: &Value) -> Result<()> {
        self.states.push(state);
        debug!("Pushed state, depth {}", self.states.len());
        match self.states.last_mut() {
            Some(top) => top.enter(ctx, params),
            None => Ok(()),
        }
    }

    /// Exit and remove the top state.
    pub fn pop(&mut self, ctx: &mut C) -> Result<()> {
        let top = self.states.last_mut().ok_or(Error::EmptyStack)?;
        top.exit(ctx);
        self.states.pop();
        debug!("Popped state, depth {}", self.states.len());
        Ok(())
    }

    pub fn on_input(&mut self, ctx: &mut C, input_id: &str, data: &InputData) -> Result<()> {
        let top = self.states.last_mut().ok_or(Error::EmptyStack)?;
        top.on_input(ctx, input_id, data);
        Ok(())
    }

    pub fn update(&mut self, ctx: &mut C, dt: f32) -> Result<()> {
        let top = self.states.last_mut().ok_or(Error::EmptyStack)?;
        top.update(ctx, dt);
        Ok(())
    }

    /// Render every state, bottom first. An empty stack draws nothing.
    pub fn render(&self, canvas: &mut dyn Canvas) {
        for state in &self.states {
            state.render(canvas);
        }
    }

    /// Drop every state *without* calling `exit` on any of them.
    ///
    /// States holding resources (timer handles, listeners) leak them; pop
    /// each one instead when that matters.
    pub fn clear(&mut self) {
        if !self.states.is_empty() {
            warn!("Clearing {} stacked states without exit", self.states.len());
        }
        self.states.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::input::{InputData, KeyboardData};
    use crate::math::Vec2;
    use crate::resources::canvas::{Canvas, Color, FrameRecorder, TextStyle};

    struct Layer(&'static str);

    impl State<Vec<String>> for Layer {
        fn enter(&mut self, ctx: &mut Vec<String>, _params: &Value) -> Result<()> {
            ctx.push(format!("enter:{}", self.0));
            Ok(())
        }
        fn exit(&mut self, ctx: &mut Vec<String>) {
            ctx.push(format!("exit:{}", self.0));
        }
        fn on_input(&mut self, ctx: &mut Vec<String>, input_id: &str, _data: &InputData) {
            ctx.push(format!("input:{}:{}", self.0, input_id));
        }
        fn update(&mut self, ctx: &mut Vec<String>, _dt: f32) {
            ctx.push(format!("update:{}", self.0));
        }
        fn render(&self, canvas: &mut dyn Canvas) {
            canvas.draw_text(self.0, Vec2::ZERO, Color::WHITE, TextStyle::PLAIN);
        }
    }

    fn key() -> InputData {
        InputData::Keyboard(KeyboardData::press(None))
    }

    fn setup() -> (StateStack<Vec<String>>, Vec<String>) {
        (StateStack::new(), Vec::new())
    }

    #[test]
    fn test_empty_stack_errors() {
        let (mut stack, mut log) = setup();
        assert_eq!(stack.pop(&mut log), Err(Error::EmptyStack));
        assert_eq!(stack.update(&mut log, 0.1), Err(Error::EmptyStack));
        assert_eq!(stack.on_input(&mut log, "up", &key()), Err(Error::EmptyStack));
        let mut canvas = FrameRecorder::default();
        stack.render(&mut canvas);
        assert!(canvas.commands().is_empty());
    }

    #[test]
    fn test_only_top_receives_update_and_input() {
        let (mut stack, mut log) = setup();
        stack.push(Box::new(Layer("base")), &mut log, &Value::Null).unwrap();
        stack.push(Box::new(Layer("menu")), &mut log, &Value::Null).unwrap();
        log.clear();
        stack.update(&mut log, 0.1).unwrap();
        stack.on_input(&mut log, "start", &key()).unwrap();
        assert_eq!(log, vec!["update:menu", "input:menu:start"]);
    }

    #[test]
    fn test_render_bottom_to_top() {
        let (mut stack, mut log) = setup();
        stack.push(Box::new(Layer("base")), &mut log, &Value::Null).unwrap();
        stack.push(Box::new(Layer("hud")), &mut log, &Value::Null).unwrap();
        let mut canvas = FrameRecorder::default();
        stack.render(&mut canvas);
        assert_eq!(canvas.texts(), vec!["base", "hud"]);
    }

    #[test]
    fn test_pop_restores_previous_top() {
        let (mut stack, mut log) = setup();
        stack.push(Box::new(Layer("base")), &mut log, &Value::Null).unwrap();
        stack.push(Box::new(Layer("pause")), &mut log, &Value::Null).unwrap();
        stack.pop(&mut log).unwrap();
        stack.update(&mut log, 0.1).unwrap();
        assert_eq!(
            log,
            vec!["enter:base", "enter:pause", "exit:pause", "update:base"]
        );
    }

    #[test]
    fn test_clear_skips_exit() {
        let (mut stack, mut log) = setup();
        stack.push(Box::new(Layer("a")), &mut log, &Value::Null).unwrap();
        stack.push(Box::new(Layer("b")), &mut log, &Value::Null).unwrap();
        stack.clear();
        assert!(stack.is_empty());
        assert_eq!(log, vec!["enter:a", "enter:b"]);
    }
}
