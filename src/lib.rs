//! geoscribe - interactive feature map
//!
//! View, draw, edit, measure and search geographic features on a web map
//! backed by a remote feature store. The crate holds the interaction engine
//! (tool state machine, selection sync, map surface model) plus the thin
//! persistence and geocoding clients; the browser build drives it through
//! `wasm::WebMapApp`.

pub mod api;
mod app;
pub mod config;
pub mod constants;
pub mod error;
pub mod geocode;
mod handlers;
pub mod list;
pub mod loading;
pub mod message;
pub mod mode;
pub mod model;
pub mod notice;
pub mod persist;
pub mod selection;
pub mod store;
pub mod style;
pub mod surface;

pub use app::{Effect, MapApp, RenderState, SelectedDetails};
pub use config::{AppConfig, ConfigError, LogLevel};
pub use error::{Error, Result, ValidationError};
pub use geoscribe_geo as geo;

// WASM entry point
#[cfg(target_arch = "wasm32")]
pub mod wasm;

#[cfg(test)]
mod tests;
