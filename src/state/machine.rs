use log::{debug, info};
use rustc_hash::FxHashMap;
use serde_json::Value;

use super::{EmptyState, State, StateFactory};
use crate::error::{Error, Result};
use crate::events::input::InputData;
use crate::resources::canvas::Canvas;

/// Holds exactly one live state and mediates transitions between named states.
pub struct StateMachine<C> {
    factories: FxHashMap<String, StateFactory<C>>,
    current: Box<dyn State<C>>,
    current_name: Option<String>,
}

impl<C> Default for StateMachine<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> StateMachine<C> {
    /// Create a machine whose current state is [`EmptyState`].
    pub fn new() -> Self {
        StateMachine {
            factories: FxHashMap::default(),
            current: Box::new(EmptyState),
            current_name: None,
        }
    }

    /// Builder form of [`register`](Self::register).
    pub fn with_state(
        mut self,
        name: impl Into<String>,
        factory: impl Fn() -> Box<dyn State<C>> + 'static,
    ) -> Self {
        self.register(name, factory);
        self
    }

    /// Register (or replace) the factory used to build `name`.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        factory: impl Fn() -> Box<dyn State<C>> + 'static,
    ) {
        self.factories.insert(name.into(), Box::new(factory));
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Name of the current state, `None` before the first change.
    pub fn current_name(&self) -> Option<&str> {
        self.current_name.as_deref()
    }

    /// Replace the current state with a fresh instance of `name`.
    ///
    /// The old state's `exit` always runs before the new state's `enter`.
    /// An unregistered name fails with [`Error::UnknownState`] and leaves the
    /// current state untouched. If `enter` fails the new state stays current;
    /// there is no rollback to the previous one.
    pub fn change(&mut self, name: &str, ctx: &mut C, params: &Value) -> Result<()> {
        let Some(factory) = self.factories.get(name) else {
            return Err(Error::UnknownState(name.to_string()));
        };
        info!(
            "State change: {} -> {}",
            self.current_name.as_deref().unwrap_or("<empty>"),
            name
        );
        self.current.exit(ctx);
        self.current = factory();
        self.current_name = Some(name.to_string());
        debug!("Entering state {name} with {params}");
        self.current.enter(ctx, params)
    }

    pub fn on_input(&mut self, ctx: &mut C, input_id: &str, data: &InputData) {
        self.current.on_input(ctx, input_id, data);
    }

    pub fn update(&mut self, ctx: &mut C, dt: f32) {
        self.current.update(ctx, dt);
    }

    pub fn render(&self, canvas: &mut dyn Canvas) {
        self.current.render(canvas);
    }
}
