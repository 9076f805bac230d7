//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the playback session,
//! the cursor and transient input state.

mod model;

pub use model::*;
