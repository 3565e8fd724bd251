//! Layout engine for lifespan timelines.
//!
//! Places time-bounded entities on one horizontal axis: overlapping
//! lifespans get separate rows, empty centuries are compressed, and every
//! year maps to a pixel and back.

pub mod config;
pub mod dataset;
pub mod layout;
pub mod model;
pub mod navigation;

pub use config::{ConfigError, LayoutConfig, ValidationPolicy};
pub use dataset::{DatasetError, parse_entities};
pub use layout::{LayoutError, LayoutParams, LayoutResult, Metrics, layout_entities, select_ticks};
