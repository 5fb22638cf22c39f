use super::{LazyListPlan, ListAxis, RenderStrategy};
use crate::error::PreparationError;
use crate::node::{
    ButtonProps, CardProps, ChartKind, ChartSpec, ColumnProps, ImageProps, Node, SpacerProps,
    TextProps, TopAppBarProps,
};
use ahash::AHashMap;
use std::sync::Arc;

/// Defines the contract for turning one node type into a `RenderStrategy`.
pub trait ComponentBuilder: Send + Sync {
    fn component_type(&self) -> &str;
    fn build(&self, node: &Node) -> Result<RenderStrategy, PreparationError>;
}

fn failed(node: &Node, message: &str) -> PreparationError {
    PreparationError::Failed {
        node_type: node.node_type.clone(),
        message: message.to_string(),
    }
}

fn image(node: &Node) -> Result<RenderStrategy, PreparationError> {
    let props = ImageProps::from_node(node);
    if props.url.is_empty() {
        return Err(failed(node, "image url is empty"));
    }
    Ok(RenderStrategy::Image(props))
}

fn chart(kind: ChartKind, node: &Node) -> Result<RenderStrategy, PreparationError> {
    let spec = ChartSpec::from_node(kind, node);
    if spec.is_empty() {
        return Err(failed(node, "chart has no plottable data points"));
    }
    Ok(RenderStrategy::Chart(spec))
}

fn lazy_list(node: &Node, axis: ListAxis) -> Result<RenderStrategy, PreparationError> {
    if node
        .data_source
        .as_ref()
        .is_some_and(|ds| ds.source_type.trim().is_empty())
    {
        return Err(failed(node, "dataSource has no type"));
    }
    LazyListPlan::from_node(node, axis)
        .map(|plan| RenderStrategy::LazyList(Arc::new(plan)))
        .ok_or_else(|| failed(node, "lazy list has no dataSource"))
}

/// Master macro to define all built-in component builders, their registration, and their creation.
macro_rules! define_component_builders {
    ( $( ($struct_name:ident, $tag:literal, $build:expr) ),* $(,)? ) => {
        // 1. Define all the builder structs and their implementations
        $(
            struct $struct_name;
            impl ComponentBuilder for $struct_name {
                fn component_type(&self) -> &str { $tag }
                fn build(&self, node: &Node) -> Result<RenderStrategy, PreparationError> {
                    let build: fn(&Node) -> Result<RenderStrategy, PreparationError> = $build;
                    build(node)
                }
            }
        )*

        // 2. Define the function to register all default builders
        pub(super) fn register_default_builders(registry: &mut AHashMap<String, Box<dyn ComponentBuilder>>) {
            $( registry.insert($tag.to_string(), Box::new($struct_name)); )*
        }

        // 3. Define the function to create a builder by its type tag
        pub(super) fn create_builder_by_name(name: &str) -> Option<Box<dyn ComponentBuilder>> {
            match name {
                $( $tag => Some(Box::new($struct_name)), )*
                _ => None,
            }
        }
    };
}

define_component_builders! {
    // Containers
    (ColumnBuilder, "column", |n| Ok(RenderStrategy::Column(ColumnProps::from_node(n)))),
    (RowBuilder, "row", |_| Ok(RenderStrategy::Row)),
    (ScrollableColumnBuilder, "scrollable_column", |_| Ok(RenderStrategy::ScrollableColumn)),
    (CardBuilder, "card", |n| Ok(RenderStrategy::Card(CardProps::from_node(n)))),

    // Leaves
    (TextBuilder, "text", |n| Ok(RenderStrategy::Text(TextProps::from_node(n)))),
    (ButtonBuilder, "button", |n| Ok(RenderStrategy::Button(ButtonProps::from_node(n)))),
    (ImageBuilder, "image", image),
    (SpacerBuilder, "spacer", |n| Ok(RenderStrategy::Spacer(SpacerProps::from_node(n)))),
    (TopAppBarBuilder, "top_app_bar", |n| Ok(RenderStrategy::TopAppBar(TopAppBarProps::from_node(n)))),
    (ProgressIndicatorBuilder, "progress_indicator", |_| Ok(RenderStrategy::ProgressIndicator)),

    // Charts
    (BarChartBuilder, "bar_chart", |n| chart(ChartKind::Bar, n)),
    (LineChartBuilder, "line_chart", |n| chart(ChartKind::Line, n)),
    (PieChartBuilder, "pie_chart", |n| chart(ChartKind::Pie, n)),
    (BubbleChartBuilder, "bubble_chart", |n| chart(ChartKind::Bubble, n)),
    (RadarChartBuilder, "radar_chart", |n| chart(ChartKind::Radar, n)),

    // Lists
    (LazyColumnBuilder, "lazy_column", |n| lazy_list(n, ListAxis::Vertical)),
    (LazyRowBuilder, "lazy_row", |n| lazy_list(n, ListAxis::Horizontal)),
    (EnhancedLazyColumnBuilder, "enhanced_lazy_column", |n| lazy_list(n, ListAxis::Vertical)),
    (LazyGridBuilder, "lazy_grid", |n| lazy_list(n, ListAxis::Grid { columns: n.columns.unwrap_or(2).max(1) })),
}
