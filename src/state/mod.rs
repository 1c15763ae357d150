//! Game states and the two containers that drive them.
//!
//! A [`State`] is a named mode of the game with five lifecycle hooks, all
//! optional. States are generic over a context type `C`: whatever owns the
//! container passes `&mut C` into every hook, which is how a state reaches
//! the timer registry, requests transitions or reads settings without a
//! global.
//!
//! - [`StateMachine`] holds exactly one state and replaces it on
//!   [`change`](StateMachine::change).
//! - [`StateStack`] keeps a stack; the top gets input and updates, every
//!   layer renders.
//!
//! Enter parameters are a free-form [`serde_json::Value`].
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use stepframe::state::{State, StateMachine};
//!
//! #[derive(Default)]
//! struct Counter { entered: u32 }
//!
//! struct Title;
//! impl State<Counter> for Title {
//!     fn enter(&mut self, ctx: &mut Counter, _params: &serde_json::Value) -> stepframe::error::Result<()> {
//!         ctx.entered += 1;
//!         Ok(())
//!     }
//! }
//!
//! let mut machine = StateMachine::new().with_state("title", || Box::new(Title));
//! let mut ctx = Counter::default();
//! machine.change("title", &mut ctx, &json!({})).unwrap();
//! assert_eq!(ctx.entered, 1);
//! assert_eq!(machine.current_name(), Some("title"));
//! ```

mod machine;
mod stack;

pub use machine::StateMachine;
pub use stack::StateStack;

use serde_json::Value;

use crate::error::Result;
use crate::events::input::InputData;
use crate::resources::canvas::Canvas;

/// Lifecycle hooks of a game mode. Every hook defaults to a no-op.
pub trait State<C> {
    /// Called right after the state becomes active.
    fn enter(&mut self, _ctx: &mut C, _params: &Value) -> Result<()> {
        Ok(())
    }

    /// Called right before the state is replaced or popped.
    fn exit(&mut self, _ctx: &mut C) {}

    fn on_input(&mut self, _ctx: &mut C, _input_id: &str, _data: &InputData) {}

    fn update(&mut self, _ctx: &mut C, _dt: f32) {}

    fn render(&self, _canvas: &mut dyn Canvas) {}
}

/// Builds a fresh state each time its name is entered.
pub type StateFactory<C> = Box<dyn Fn() -> Box<dyn State<C>>>;

/// State that does nothing; what a machine holds before its first change.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyState;

impl<C> State<C> for EmptyState {}
