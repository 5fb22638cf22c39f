//! The seam between compiled trees and a host UI toolkit.
//!
//! The engine never draws. It walks a compiled tree and tells a
//! [`RenderBackend`] which primitive to draw with which resolved attributes.

mod backend;
mod collab;
mod painter;
mod tree;

pub use backend::{Attributes, ClickTarget, Primitive, RenderBackend};
pub use collab::{
    ActionHandler, ImageConstraints, ImageHandle, ImageLoader, LoggingActionHandler,
    PassthroughImageLoader,
};
pub use painter::{Painter, RETRY_LIST_ACTION, list_key};
pub use tree::{RenderedElement, TreeBackend};

pub(crate) use painter::text;
