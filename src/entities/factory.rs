//! Build entities from a prototype type, a position and a property map.
//!
//! The prototype is any type that deserializes from a JSON object. `create`
//! merges `x` and `y` into the given properties (overriding any keys of the
//! same name) and deserializes the result, so missing properties fall back
//! to the prototype's `#[serde(default)]` values.
//!
//! # Example
//!
//! ```
//! use serde::Deserialize;
//! use serde_json::json;
//! use stepframe::entities::factory::Factory;
//!
//! #[derive(Deserialize)]
//! struct Crate { x: f32, y: f32, #[serde(default)] texture: String }
//!
//! let factory = Factory::<Crate>::new();
//! let c = factory.create(5.0, 8.0, &json!({ "texture": "crate" })).unwrap();
//! assert_eq!((c.x, c.y, c.texture.as_str()), (5.0, 8.0, "crate"));
//! ```

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Creates `T` values at a position.
pub struct Factory<T> {
    defaults: Map<String, Value>,
    _prototype: PhantomData<fn() -> T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Factory {
            defaults: Map::new(),
            _prototype: PhantomData,
        }
    }
}

impl<T> Clone for Factory<T> {
    fn clone(&self) -> Self {
        Factory {
            defaults: self.defaults.clone(),
            _prototype: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for Factory<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Factory")
            .field("prototype", &std::any::type_name::<T>())
            .field("defaults", &self.defaults)
            .finish()
    }
}

impl<T: DeserializeOwned> Factory<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Property applied to every created value unless `create` overrides it.
    pub fn with_default(mut self, key: impl Into<String>, value: Value) -> Self {
        self.defaults.insert(key.into(), value);
        self
    }

    /// Build a `T` at `(x, y)`.
    ///
    /// `properties` must be a JSON object or `null`; anything else, or a map
    /// the prototype cannot be built from, is an
    /// [`Error::InvalidArgument`].
    pub fn create(&self, x: f32, y: f32, properties: &Value) -> Result<T> {
        let mut merged = self.defaults.clone();
        match properties {
            Value::Null => {}
            Value::Object(map) => merged.extend(map.clone()),
            other => {
                return Err(Error::InvalidArgument(format!(
                    "factory properties must be an object, got {other}"
                )));
            }
        }
        merged.insert("x".into(), Value::from(x));
        merged.insert("y".into(), Value::from(y));
        serde_json::from_value(Value::Object(merged)).map_err(|e| {
            Error::InvalidArgument(format!(
                "cannot build {}: {e}",
                std::any::type_name::<T>()
            ))
        })
    }
}
