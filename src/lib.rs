//! # Hyouji - Server-Driven UI Engine
//!
//! **Hyouji** turns JSON screen documents into live component trees. A client
//! ships one engine instead of per-screen code: the server describes each
//! screen's widget tree, and Hyouji parses, validates, binds, compiles and
//! caches it, then hands the result to whatever UI toolkit the host uses.
//!
//! ## Core Workflow
//!
//! 1.  **Build an Engine**: Use `Engine::builder` to wire in your action handler, image
//!     loader, data fetcher and (optionally) an analytics sink. Build it once at startup.
//! 2.  **Create a Renderer**: Each screen gets a `Renderer`, which owns the
//!     `Loading -> Success | Error` state machine for the document it is showing.
//! 3.  **Load**: `Renderer::load` parses the document, validates and analyzes it on a
//!     bounded worker pool, compiles every node through the component factory, and caches
//!     the compiled tree by document fingerprint.
//! 4.  **Render**: `Renderer::render` walks the compiled tree into your `RenderBackend`.
//!     It is cheap and idempotent, so call it on every redraw.
//!
//! Lazy lists bind each record into their item template with `{{path.to.value}}`
//! placeholders and page through api data sources as items become visible.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hyouji::prelude::*;
//!
//! #[tokio::main]
//! async fn main() {
//!     let engine = Engine::builder().build();
//!     let renderer = engine.renderer();
//!
//!     let json = r#"{
//!         "version": "1.0",
//!         "screen": {
//!             "id": "home",
//!             "title": "Home",
//!             "layout": { "type": "text", "properties": { "text": "Hi" } }
//!         }
//!     }"#;
//!
//!     match renderer.load(json).await {
//!         RenderState::Success(compiled) => {
//!             println!("Compiled {} components", compiled.metadata.component_count);
//!         }
//!         RenderState::Error { message, .. } => eprintln!("Failed: {}", message),
//!         RenderState::Loading => unreachable!(),
//!     }
//!
//!     // Draw into a backend. `TreeBackend` records what would be drawn.
//!     let mut backend = TreeBackend::new();
//!     renderer.render(&mut backend);
//!     print!("{}", backend.outline());
//! }
//! ```

pub mod analysis;
pub mod analytics;
pub mod binder;
pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod factory;
pub mod fingerprint;
pub mod list;
pub mod modifier;
pub mod node;
pub mod prelude;
pub mod render;
pub mod renderer;
pub mod schema;
pub mod validator;
pub mod value;
