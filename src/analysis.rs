//! Complexity estimation for single nodes and whole trees.
//!
//! Tree analysis is a pure fold: each subtree reports a [`TreeSummary`] and
//! parents combine them.

use crate::fingerprint::node_key;
use crate::node::{ComponentType, Node};
use std::fmt;

/// How much work preparing a node is expected to take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ComponentComplexity {
    Low,
    Medium,
    High,
}

/// Collaborators a node needs at render time. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dependency {
    Network,
    ImageLoader,
    ActionHandler,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderMetadata {
    pub requires_async_data: bool,
    pub complexity: ComponentComplexity,
    pub dependencies: Vec<Dependency>,
    pub cache_key: String,
}

fn is_remote_image(node: &Node) -> bool {
    node.kind() == ComponentType::Image
        && node.prop_str("url").is_some_and(|url| url.starts_with("http"))
}

fn has_api_source(node: &Node) -> bool {
    node.data_source.as_ref().is_some_and(|ds| ds.is_api())
}

/// Estimates the preparation tier of one node.
///
/// Lazy lists are `High`; containers with more than `medium_child_threshold`
/// children and remote images are `Medium`; everything else is `Low`.
pub fn analyze_component(node: &Node, medium_child_threshold: usize) -> RenderMetadata {
    analyze_keyed(node, medium_child_threshold, node_key(node))
}

/// [`analyze_component`] for a caller that already holds the node's key.
pub(crate) fn analyze_keyed(
    node: &Node,
    medium_child_threshold: usize,
    cache_key: String,
) -> RenderMetadata {
    let kind = node.kind();
    let remote_image = is_remote_image(node);
    let api_source = has_api_source(node);

    let complexity = if kind.is_lazy() {
        ComponentComplexity::High
    } else if (kind.is_container() && node.children.len() > medium_child_threshold)
        || remote_image
    {
        ComponentComplexity::Medium
    } else {
        ComponentComplexity::Low
    };

    let mut dependencies = Vec::new();
    if api_source || remote_image {
        dependencies.push(Dependency::Network);
    }
    if kind == ComponentType::Image {
        dependencies.push(Dependency::ImageLoader);
    }
    if !node.actions.is_empty() {
        dependencies.push(Dependency::ActionHandler);
    }

    RenderMetadata {
        requires_async_data: api_source || remote_image,
        complexity,
        dependencies,
        cache_key,
    }
}

/// Overall weight of a screen, bucketed by component count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScreenComplexity {
    Low,
    Medium,
    High,
}

impl ScreenComplexity {
    fn from_count(count: usize) -> Self {
        match count {
            0..20 => ScreenComplexity::Low,
            20..100 => ScreenComplexity::Medium,
            _ => ScreenComplexity::High,
        }
    }
}

impl fmt::Display for ScreenComplexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScreenComplexity::Low => write!(f, "low"),
            ScreenComplexity::Medium => write!(f, "medium"),
            ScreenComplexity::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeMetadata {
    pub component_count: usize,
    pub max_depth: usize,
    pub has_async_components: bool,
    pub chart_count: usize,
    pub estimated_render_time_ms: u64,
    pub complexity: ScreenComplexity,
}

#[derive(Debug, Clone, Copy, Default)]
struct TreeSummary {
    count: usize,
    depth: usize,
    has_async: bool,
    charts: usize,
}

fn summarize(node: &Node) -> TreeSummary {
    let kind = node.kind();
    let own = TreeSummary {
        count: 1,
        depth: 1,
        has_async: kind.is_lazy() && has_api_source(node),
        charts: usize::from(kind.is_chart()),
    };
    node.children
        .iter()
        .map(summarize)
        .fold(own, |acc, child| TreeSummary {
            count: acc.count + child.count,
            depth: acc.depth.max(child.depth + 1),
            has_async: acc.has_async || child.has_async,
            charts: acc.charts + child.charts,
        })
}

/// Summarizes a whole tree in one pass.
pub fn analyze_tree(root: &Node) -> TreeMetadata {
    let summary = summarize(root);
    TreeMetadata {
        component_count: summary.count,
        max_depth: summary.depth,
        has_async_components: summary.has_async,
        chart_count: summary.charts,
        estimated_render_time_ms: summary.count as u64 * 2,
        complexity: ScreenComplexity::from_count(summary.count),
    }
}
