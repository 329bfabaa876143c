pub mod app;
pub mod assets;
pub mod camera;
pub mod constants;
pub mod error;
pub mod settings;
pub mod world;

pub use app::App;
pub use camera::Camera;
pub use error::{Error, Result};
pub use settings::{Key, Router, Settings, Value};
pub use world::{Generator, HeightField, Mode, Terrain, World};
