//! Stationline - a scroll-driven train ride through a list of stations.
//!
//! # Architecture
//!
//! Layered modules with strict inward-only dependencies:
//!
//! - **sim**: Math primitives (Float3, Quaternion, Pose, damping)
//! - **curve**: Arc-length parameterized lines, Beziers and composite paths
//! - **content** / **config**: Station data and tunables, loaded from JSON
//! - **track**: Viewport layout, main line, branches, rails
//! - **motion**: Autopilots, scroll sync, navigation state machine
//! - **scene**: Train, camera, signs, ground and the per-frame [`Scene`]
//! - **ffi**: C FFI bindings (feature `ffi`)
//!
//! # Usage
//!
//! ```no_run
//! use stationline::{InputEvent, Scene, SceneConfig, StationList, Viewport};
//!
//! let stations = StationList::embedded().unwrap();
//! let mut scene = Scene::new(stations, SceneConfig::default(), Viewport::new(30.0, 20.0));
//! scene.handle(InputEvent::EnterBranch(1));
//! let frame = scene.step(1.0 / 60.0);
//! println!("{:?}", frame.train.front().pose);
//! ```
//!
//! For C hosts, build with `--features ffi`, link the cdylib and use the `stl_*` functions.

pub mod config;
pub mod content;
pub mod curve;
pub mod motion;
pub mod scene;
pub mod sim;
pub mod track;

#[cfg(feature = "ffi")]
pub mod ffi;

// Re-export commonly used types at crate root
pub use config::SceneConfig;
pub use content::{Station, StationList};
pub use scene::{InputEvent, Scene, SceneFrame};
pub use sim::{Float3, Pose, Quaternion};
pub use track::{ActiveTrack, Viewport};
