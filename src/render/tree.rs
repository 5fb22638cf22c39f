use super::backend::{Attributes, Primitive, RenderBackend};
use std::fmt::Write;

/// One recorded primitive and everything drawn inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedElement {
    pub primitive: Primitive,
    pub attributes: Attributes,
    pub children: Vec<RenderedElement>,
}

impl RenderedElement {
    /// The visible label of text-bearing primitives.
    pub fn label(&self) -> Option<&str> {
        match &self.primitive {
            Primitive::Text(props) => Some(&props.text),
            Primitive::Button(props) => Some(&props.text),
            Primitive::TopAppBar(props) => Some(&props.title),
            Primitive::Fallback(label) => Some(label),
            _ => None,
        }
    }

    /// Depth-first, pre-order.
    pub fn descendants(&self) -> Vec<&RenderedElement> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.descendants());
        }
        out
    }

    pub fn find(&self, predicate: impl Fn(&RenderedElement) -> bool) -> Option<&RenderedElement> {
        self.descendants().into_iter().find(|e| predicate(*e))
    }

    pub fn find_label(&self, label: &str) -> Option<&RenderedElement> {
        self.find(|e| e.label() == Some(label))
    }

    pub fn labels(&self) -> Vec<String> {
        self.descendants()
            .into_iter()
            .filter_map(|e| e.label().map(str::to_string))
            .collect()
    }
}

/// A backend that records what it is asked to draw.
#[derive(Debug, Default)]
pub struct TreeBackend {
    roots: Vec<RenderedElement>,
    stack: Vec<RenderedElement>,
}

impl TreeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn roots(&self) -> &[RenderedElement] {
        &self.roots
    }

    pub fn root(&self) -> Option<&RenderedElement> {
        self.roots.first()
    }

    pub fn labels(&self) -> Vec<String> {
        self.roots.iter().flat_map(RenderedElement::labels).collect()
    }

    /// An indented outline, one primitive per line.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        for root in &self.roots {
            write_outline(root, 0, &mut out);
        }
        out
    }
}

fn primitive_name(primitive: &Primitive) -> String {
    match primitive {
        Primitive::Screen(_) => "Screen".into(),
        Primitive::Column(_) => "Column".into(),
        Primitive::Row => "Row".into(),
        Primitive::ScrollColumn => "ScrollColumn".into(),
        Primitive::Card(_) => "Card".into(),
        Primitive::LazyList(axis) => format!("LazyList({:?})", axis),
        Primitive::Text(_) => "Text".into(),
        Primitive::Button(_) => "Button".into(),
        Primitive::Image { handle, .. } => format!("Image <{}>", handle.url),
        Primitive::Spacer(_) => "Spacer".into(),
        Primitive::TopAppBar(_) => "TopAppBar".into(),
        Primitive::ProgressIndicator => "ProgressIndicator".into(),
        Primitive::Shimmer { rows } => format!("Shimmer x{}", rows),
        Primitive::Chart(spec) => format!("Chart({})", spec.kind.as_str()),
        Primitive::Clickable => "Clickable".into(),
        Primitive::Weighted(weight) => format!("Weighted({})", weight),
        Primitive::Fallback(_) => "Fallback".into(),
    }
}

fn write_outline(element: &RenderedElement, depth: usize, out: &mut String) {
    let _ = write!(out, "{}{}", "  ".repeat(depth), primitive_name(&element.primitive));
    if let Some(label) = element.label() {
        let _ = write!(out, " \"{}\"", label);
    }
    if let Some(target) = &element.attributes.on_click {
        let _ = write!(out, " -> {}", target.action.action_type);
    }
    out.push('\n');
    for child in &element.children {
        write_outline(child, depth + 1, out);
    }
}

impl RenderBackend for TreeBackend {
    fn enter(&mut self, primitive: Primitive, attributes: Attributes) {
        self.stack.push(RenderedElement {
            primitive,
            attributes,
            children: Vec::new(),
        });
    }

    fn exit(&mut self) {
        let Some(done) = self.stack.pop() else {
            return;
        };
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(done),
            None => self.roots.push(done),
        }
    }
}
