//! Scene machine plus overlay stack.
//!
//! [`Screens`] combines a [`StateMachine`] holding the current scene
//! (`title`, `play`, ...) with a [`StateStack`] of overlays such as a pause
//! menu. Input and updates go to the top overlay when there is one, else to
//! the scene; rendering draws the scene and then every overlay above it.
//!
//! # Related
//!
//! - [`crate::resources::gamestate::StateRequest`] – what [`Screens::apply`] executes
//! - [`crate::systems::screens`] – systems driving this resource each frame

use log::debug;
use rustc_hash::FxHashMap;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::events::input::InputData;
use crate::resources::canvas::Canvas;
use crate::resources::gamestate::StateRequest;
use crate::state::{State, StateFactory, StateMachine, StateStack};

pub struct Screens<C> {
    scenes: StateMachine<C>,
    overlays: StateStack<C>,
    overlay_factories: FxHashMap<String, StateFactory<C>>,
    overlay_names: Vec<String>,
}

impl<C> Screens<C> {
    pub fn new(scenes: StateMachine<C>) -> Self {
        Screens {
            scenes,
            overlays: StateStack::new(),
            overlay_factories: FxHashMap::default(),
            overlay_names: Vec::new(),
        }
    }

    /// Register an overlay that can be pushed by name.
    pub fn with_overlay(
        mut self,
        name: impl Into<String>,
        factory: impl Fn() -> Box<dyn State<C>> + 'static,
    ) -> Self {
        self.overlay_factories.insert(name.into(), Box::new(factory));
        self
    }

    pub fn scene_name(&self) -> Option<&str> {
        self.scenes.current_name()
    }

    /// Names of the stacked overlays, bottom first.
    pub fn overlay_names(&self) -> &[String] {
        &self.overlay_names
    }

    pub fn overlay_depth(&self) -> usize {
        self.overlays.len()
    }

    pub fn on_input(&mut self, ctx: &mut C, input_id: &str, data: &InputData) {
        if let Err(Error::EmptyStack) = self.overlays.on_input(ctx, input_id, data) {
            self.scenes.on_input(ctx, input_id, data);
        }
    }

    pub fn update(&mut self, ctx: &mut C, dt: f32) {
        if let Err(Error::EmptyStack) = self.overlays.update(ctx, dt) {
            self.scenes.update(ctx, dt);
        }
    }

    pub fn render(&self, canvas: &mut dyn Canvas) {
        self.scenes.render(canvas);
        self.overlays.render(canvas);
    }

    /// Carry out a transition request.
    ///
    /// A scene change pops (and exits) every overlay first. Unknown names
    /// fail with [`Error::UnknownState`] before anything is torn down.
    pub fn apply(&mut self, request: StateRequest, ctx: &mut C) -> Result<()> {
        match request {
            StateRequest::Change { name, params } => {
                if !self.scenes.is_registered(&name) {
                    return Err(Error::UnknownState(name));
                }
                while !self.overlays.is_empty() {
                    self.pop_overlay(ctx)?;
                }
                self.scenes.change(&name, ctx, &params)
            }
            StateRequest::Push { name, params } => self.push_overlay(&name, ctx, &params),
            StateRequest::Pop => self.pop_overlay(ctx),
        }
    }

    fn push_overlay(&mut self, name: &str, ctx: &mut C, params: &Value) -> Result<()> {
        let factory = self
            .overlay_factories
            .get(name)
            .ok_or_else(|| Error::UnknownState(name.to_string()))?;
        let state = factory();
        self.overlay_names.push(name.to_string());
        debug!("Pushing overlay {name}");
        self.overlays.push(state, ctx, params)
    }

    fn pop_overlay(&mut self, ctx: &mut C) -> Result<()> {
        self.overlays.pop(ctx)?;
        if let Some(name) = self.overlay_names.pop() {
            debug!("Popped overlay {name}");
        }
        Ok(())
    }
}
