use super::collab::{ActionHandler, ImageHandle};
use crate::factory::ListAxis;
use crate::modifier::ResolvedModifier;
use crate::node::{
    Action, ButtonProps, CardProps, ChartSpec, ColumnProps, ImageProps, SpacerProps, TextProps,
    TopAppBarProps,
};
use crate::schema::Theme;
use std::fmt;
use std::sync::Arc;

/// The toolkit primitives the engine draws with.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Screen(Theme),
    Column(ColumnProps),
    Row,
    ScrollColumn,
    Card(CardProps),
    LazyList(ListAxis),
    Text(TextProps),
    Button(ButtonProps),
    Image {
        props: ImageProps,
        handle: ImageHandle,
    },
    Spacer(SpacerProps),
    TopAppBar(TopAppBarProps),
    ProgressIndicator,
    Shimmer {
        rows: u32,
    },
    Chart(ChartSpec),
    Clickable,
    /// A proportional slot in a row or column.
    Weighted(f64),
    Fallback(String),
}

/// A bound action plus the handler that receives it.
#[derive(Clone)]
pub struct ClickTarget {
    pub action: Action,
    handler: Arc<dyn ActionHandler>,
}

impl ClickTarget {
    pub fn new(action: Action, handler: Arc<dyn ActionHandler>) -> Self {
        Self { action, handler }
    }

    pub fn fire(&self) {
        self.handler.handle_action(&self.action);
    }
}

impl fmt::Debug for ClickTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClickTarget")
            .field("action", &self.action)
            .finish_non_exhaustive()
    }
}

impl PartialEq for ClickTarget {
    fn eq(&self, other: &Self) -> bool {
        self.action == other.action
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Attributes {
    pub id: Option<String>,
    pub modifier: ResolvedModifier,
    pub on_click: Option<ClickTarget>,
}

/// Receives the compiled tree as a sequence of nested primitives.
///
/// Every `enter` is matched by exactly one `exit`.
pub trait RenderBackend {
    fn enter(&mut self, primitive: Primitive, attributes: Attributes);
    fn exit(&mut self);

    fn leaf(&mut self, primitive: Primitive, attributes: Attributes) {
        self.enter(primitive, attributes);
        self.exit();
    }
}
