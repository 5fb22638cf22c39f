//! Structural checks that decide whether a node is safe to render.

use crate::node::{ComponentType, Node};
use tracing::debug;

/// Errors block rendering of a subtree; warnings only degrade it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(Vec<String>),
    Warning(Vec<String>),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        !matches!(self, ValidationResult::Invalid(_))
    }

    pub fn errors(&self) -> &[String] {
        match self {
            ValidationResult::Invalid(errors) => errors,
            _ => &[],
        }
    }

    pub fn warnings(&self) -> &[String] {
        match self {
            ValidationResult::Warning(warnings) => warnings,
            _ => &[],
        }
    }
}

#[derive(Debug, Default)]
struct Findings {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl Findings {
    fn merge(mut self, other: Findings) -> Self {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self
    }

    fn into_result(self) -> ValidationResult {
        if !self.errors.is_empty() {
            ValidationResult::Invalid(self.errors)
        } else if !self.warnings.is_empty() {
            ValidationResult::Warning(self.warnings)
        } else {
            ValidationResult::Valid
        }
    }
}

/// Validates a node and its whole subtree.
///
/// Findings are aggregated bottom-up: one invalid descendant makes the whole
/// walk `Invalid`, carrying every error found anywhere in the tree.
pub fn validate(node: &Node) -> ValidationResult {
    let result = collect(node).into_result();
    if !result.is_valid() {
        debug!(node_type = %node.node_type, errors = ?result.errors(), "validation failed");
    }
    result
}

/// Validates only the node's own type-specific rules, ignoring children.
pub fn validate_node(node: &Node) -> ValidationResult {
    own_findings(node).into_result()
}

fn collect(node: &Node) -> Findings {
    node.children
        .iter()
        .map(collect)
        .fold(own_findings(node), Findings::merge)
}

fn own_findings(node: &Node) -> Findings {
    let mut findings = Findings::default();
    if node.node_type.trim().is_empty() {
        findings
            .errors
            .push("Component type cannot be blank".to_string());
        return findings;
    }

    let kind = node.kind();
    match &kind {
        ComponentType::Text if !node.has_property("text") => findings
            .warnings
            .push("Text component missing 'text' property".to_string()),
        ComponentType::Button if !node.has_property("text") => findings
            .errors
            .push("Button component requires 'text' property".to_string()),
        ComponentType::Image if !node.has_property("url") => findings
            .errors
            .push("Image component requires 'url' property".to_string()),
        ComponentType::TopAppBar if !node.has_property("title") => findings
            .warnings
            .push("TopAppBar missing 'title' property".to_string()),
        ComponentType::Chart(chart) if node.prop_list(chart.data_property()).is_none() => {
            findings.errors.push(format!(
                "{} component requires '{}' property",
                chart.as_str(),
                chart.data_property()
            ))
        }
        _ => {}
    }

    if kind.is_lazy() {
        match &node.data_source {
            None => findings
                .errors
                .push("Lazy components require dataSource".to_string()),
            Some(source) if source.source_type.trim().is_empty() => findings
                .errors
                .push("dataSource requires 'type'".to_string()),
            Some(_) => {}
        }
        match &node.item_template {
            None => findings
                .errors
                .push("Lazy components require itemTemplate".to_string()),
            Some(template) if template.layout.node_type.trim().is_empty() => findings
                .errors
                .push("itemTemplate requires 'layout'".to_string()),
            Some(_) => {}
        }
    }

    let template_actions = node.item_template.iter().flat_map(|t| t.actions.iter());
    for (name, action) in node.actions.iter().chain(template_actions) {
        if action.action_type.trim().is_empty() {
            findings
                .errors
                .push(format!("Action '{}' requires 'type'", name));
        }
    }
    findings
}
