//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the hyouji crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use hyouji::prelude::*;
//!
//! # async fn run_example() -> Result<()> {
//! let json = std::fs::read_to_string("path/to/screen.json")?;
//! let screen = parse_screen(&json)?;
//! println!("{:?}", validate(&screen.screen.layout));
//!
//! let renderer = Engine::default().renderer();
//! let state = renderer.load(&json).await;
//! println!("success: {}", state.is_success());
//! # Ok(())
//! # }
//! ```

// Engine and renderer
pub use crate::engine::{Engine, EngineBuilder};
pub use crate::renderer::{CompiledScreen, RenderState, Renderer};

// Document model
pub use crate::node::{Action, ComponentType, DataSource, ItemTemplate, Modifier, Node};
pub use crate::schema::{Screen, parse_screen};
pub use crate::value::{Record, Value};

// Pipeline stages
pub use crate::analysis::{ComponentComplexity, TreeMetadata, analyze_component, analyze_tree};
pub use crate::binder::{bind_action, bind_node, bind_string};
pub use crate::factory::{
    ComponentBuilder, ComponentFactory, DefaultComponentFactory, PreparationResult,
    PreparedComponent, RenderStrategy,
};
pub use crate::validator::{ValidationResult, validate};

// Lists and collaborators
pub use crate::list::{DataFetcher, ListController, ListPhase, MockFetcher, PageRequest};
pub use crate::render::{ActionHandler, ImageLoader, RenderBackend, TreeBackend};

// Configuration and errors
pub use crate::config::EngineConfig;
pub use crate::error::{NetworkError, ParseError, PreparationError, RenderError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
