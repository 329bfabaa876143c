//! Typed key-to-handler dispatch.
//!
//! Each settings key maps to one registered handler closure over the
//! application state. Registration rejects duplicates up front, so a key
//! routed twice is caught when the table is built rather than shadowed
//! silently at dispatch time. The core's reaction to a change is a pure
//! function of (key, value); the event source does not matter.

use std::collections::HashMap;

use super::{Key, Value};
use crate::error::{Error, Result};

type Handler<T> = Box<dyn FnMut(&mut T, &Value) -> Result<()>>;

pub struct Router<T> {
    handlers: HashMap<Key, Handler<T>>,
}

impl<T> Default for Router<T> {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }
}

impl<T> Router<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the handler for `key`. Registering a key twice is a
    /// configuration error.
    pub fn register<F>(&mut self, key: Key, handler: F) -> Result<()>
    where
        F: FnMut(&mut T, &Value) -> Result<()> + 'static,
    {
        if self.handlers.contains_key(&key) {
            return Err(Error::configuration(format!(
                "handler for settings key '{}' registered twice",
                key.name()
            )));
        }
        self.handlers.insert(key, Box::new(handler));
        Ok(())
    }

    pub fn is_registered(&self, key: Key) -> bool {
        self.handlers.contains_key(&key)
    }

    /// Deliver one (key, value) change. Keys without a handler are logged
    /// and dropped; the handler's own error propagates.
    pub fn apply(&mut self, target: &mut T, key: Key, value: Value) -> Result<()> {
        match self.handlers.get_mut(&key) {
            Some(handler) => handler(target, &value),
            None => {
                log::debug!("[Settings] No handler for key '{}'", key.name());
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Target {
        seed: i64,
        fov: f64,
    }

    #[test]
    fn dispatch_reaches_the_registered_handler() {
        let mut router: Router<Target> = Router::new();
        router
            .register(Key::WorldGeneratorSeed, |t, v| {
                t.seed = v.as_i64().unwrap_or(0);
                Ok(())
            })
            .unwrap();
        router
            .register(Key::GraphicsCameraFov, |t, v| {
                t.fov = v.as_f64().unwrap_or(0.0);
                Ok(())
            })
            .unwrap();

        let mut target = Target::default();
        router
            .apply(&mut target, Key::WorldGeneratorSeed, Value::Integer(99))
            .unwrap();
        router
            .apply(&mut target, Key::GraphicsCameraFov, Value::Float(72.0))
            .unwrap();
        assert_eq!(target.seed, 99);
        assert_eq!(target.fov, 72.0);
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut router: Router<Target> = Router::new();
        router.register(Key::WorldGeneratorSeed, |_, _| Ok(())).unwrap();
        assert!(router.register(Key::WorldGeneratorSeed, |_, _| Ok(())).is_err());
    }

    #[test]
    fn unrouted_keys_are_dropped_without_error() {
        let mut router: Router<Target> = Router::new();
        let mut target = Target::default();
        router
            .apply(&mut target, Key::WorldTerrainSpacing, Value::Float(1.0))
            .unwrap();
    }

    #[test]
    fn handler_errors_propagate() {
        let mut router: Router<Target> = Router::new();
        router
            .register(Key::WorldGeneratorSize, |_, _| {
                Err(Error::configuration("rejected"))
            })
            .unwrap();
        let mut target = Target::default();
        assert!(router
            .apply(&mut target, Key::WorldGeneratorSize, Value::Integer(-1))
            .is_err());
    }
}
