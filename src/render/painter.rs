use super::backend::{Attributes, ClickTarget, Primitive, RenderBackend};
use super::collab::{ActionHandler, ImageConstraints, ImageLoader};
use crate::config::EngineConfig;
use crate::factory::{ComponentFactory, PreparedComponent, RenderStrategy};
use crate::list::{DataFetcher, ListRegistry, ListView};
use crate::modifier::ResolvedModifier;
use crate::node::{Action, ButtonProps, ColumnProps, TextProps, TextStyle};
use std::sync::Arc;

/// Action type of the retry button in a list's default error view.
pub const RETRY_LIST_ACTION: &str = "retry_list";

/// The key a lazy list is mounted under: its id, or its position in the tree.
///
/// Lists repeated inside another list's items share an id, so there the id
/// is qualified by position too.
pub fn list_key(component: &PreparedComponent, path: &str) -> String {
    match &component.id {
        Some(id) if path.contains('[') => format!("{}@{}", id, path),
        Some(id) => id.clone(),
        None => format!("list@{}", path),
    }
}

/// Walks a compiled tree into a backend.
pub struct Painter<'a> {
    pub factory: &'a dyn ComponentFactory,
    pub actions: Arc<dyn ActionHandler>,
    pub images: &'a dyn ImageLoader,
    pub lists: &'a ListRegistry,
    pub fetcher: &'a Arc<dyn DataFetcher>,
    pub config: &'a EngineConfig,
}

impl Painter<'_> {
    pub fn paint(&self, component: &PreparedComponent, path: &str, backend: &mut dyn RenderBackend) {
        self.paint_with(component, component.modifier.clone(), path, backend);
    }

    fn click(&self, action: &Action) -> ClickTarget {
        ClickTarget::new(action.clone(), self.actions.clone())
    }

    fn paint_with(
        &self,
        component: &PreparedComponent,
        modifier: ResolvedModifier,
        path: &str,
        backend: &mut dyn RenderBackend,
    ) {
        let attributes = Attributes {
            id: component.id.clone(),
            modifier,
            on_click: None,
        };
        let container = match &component.strategy {
            RenderStrategy::Column(props) => Primitive::Column(props.clone()),
            RenderStrategy::Row => Primitive::Row,
            RenderStrategy::ScrollableColumn => Primitive::ScrollColumn,
            RenderStrategy::Card(props) => Primitive::Card(props.clone()),
            RenderStrategy::LazyList(_) => return self.paint_list(component, attributes, path, backend),
            leaf => return self.paint_leaf(component, leaf, attributes, backend),
        };

        backend.enter(container, attributes);
        for (i, child) in component.children.iter().enumerate() {
            let child_path = format!("{}.{}", path, i);
            match child.modifier.weight {
                Some(weight) => {
                    backend.enter(Primitive::Weighted(weight), Attributes::default());
                    self.paint_with(child, child.modifier.without_weight(), &child_path, backend);
                    backend.exit();
                }
                None => self.paint(child, &child_path, backend),
            }
        }
        backend.exit();
    }

    fn paint_leaf(
        &self,
        component: &PreparedComponent,
        strategy: &RenderStrategy,
        mut attributes: Attributes,
        backend: &mut dyn RenderBackend,
    ) {
        let primitive = match strategy {
            RenderStrategy::Text(props) => Primitive::Text(props.clone()),
            RenderStrategy::Button(props) => {
                attributes.on_click = component.actions.get("onClick").map(|a| self.click(a));
                Primitive::Button(props.clone())
            }
            RenderStrategy::Image(props) => {
                let constraints = ImageConstraints {
                    width: attributes.modifier.width.or(props.size),
                    height: attributes.modifier.height.or(props.size),
                    circular: props.circular,
                };
                Primitive::Image {
                    handle: self.images.load_image(&props.url, &constraints),
                    props: props.clone(),
                }
            }
            RenderStrategy::Spacer(props) => Primitive::Spacer(props.clone()),
            RenderStrategy::TopAppBar(props) => Primitive::TopAppBar(props.clone()),
            RenderStrategy::ProgressIndicator => Primitive::ProgressIndicator,
            RenderStrategy::Chart(spec) => Primitive::Chart(spec.clone()),
            RenderStrategy::Unknown(type_name) => {
                Primitive::Fallback(format!("Unknown component type: {}", type_name))
            }
            RenderStrategy::Fallback(label) => Primitive::Fallback(label.clone()),
            // Containers and lists are handled by `paint_with`.
            RenderStrategy::Column(_)
            | RenderStrategy::Row
            | RenderStrategy::ScrollableColumn
            | RenderStrategy::Card(_)
            | RenderStrategy::LazyList(_) => return,
        };
        backend.leaf(primitive, attributes);
    }

    fn paint_list(
        &self,
        component: &PreparedComponent,
        attributes: Attributes,
        path: &str,
        backend: &mut dyn RenderBackend,
    ) {
        let RenderStrategy::LazyList(plan) = &component.strategy else {
            return;
        };
        let key = list_key(component, path);
        let controller = self.lists.get_or_mount(&key, plan, self.fetcher, self.config);
        backend.enter(Primitive::LazyList(plan.axis), attributes);
        self.paint_view(controller.view(self.factory), &key, path, backend);
        backend.exit();
    }

    fn paint_view(&self, view: ListView, key: &str, path: &str, backend: &mut dyn RenderBackend) {
        match view {
            ListView::Loading {
                shimmer_rows: Some(rows),
            } => backend.leaf(Primitive::Shimmer { rows }, Attributes::default()),
            ListView::Loading { shimmer_rows: None } => {
                backend.leaf(Primitive::ProgressIndicator, Attributes::default())
            }
            ListView::Items {
                items,
                loading_more,
            } => {
                for (i, item) in items.iter().enumerate() {
                    let item_path = format!("{}[{}]", path, i);
                    match &item.on_click {
                        Some(action) => {
                            backend.enter(
                                Primitive::Clickable,
                                Attributes {
                                    on_click: Some(self.click(action)),
                                    ..Default::default()
                                },
                            );
                            self.paint(&item.component, &item_path, backend);
                            backend.exit();
                        }
                        None => self.paint(&item.component, &item_path, backend),
                    }
                }
                if loading_more {
                    backend.leaf(Primitive::ProgressIndicator, Attributes::default());
                }
            }
            ListView::Empty {
                template: Some(template),
                ..
            }
            | ListView::Error {
                template: Some(template),
                ..
            } => self.paint(&template, &format!("{}.state", path), backend),
            ListView::Empty {
                template: None,
                message,
            } => backend.leaf(Primitive::Text(text(message, TextStyle::Body1)), Attributes::default()),
            ListView::Error {
                message,
                template: None,
            } => {
                backend.enter(Primitive::Column(ColumnProps::default()), Attributes::default());
                backend.leaf(
                    Primitive::Text(text("Failed to load data", TextStyle::Subtitle1)),
                    Attributes::default(),
                );
                backend.leaf(Primitive::Text(text(&message, TextStyle::Body2)), Attributes::default());
                let retry = Action::new(RETRY_LIST_ACTION).with_param("list", key);
                backend.leaf(
                    Primitive::Button(ButtonProps {
                        text: "Retry".to_string(),
                        enabled: true,
                    }),
                    Attributes {
                        on_click: Some(self.click(&retry)),
                        ..Default::default()
                    },
                );
                backend.exit();
            }
            ListView::Unsupported(source_type) => backend.leaf(
                Primitive::Fallback(format!("Unsupported data source: {}", source_type)),
                Attributes::default(),
            ),
        }
    }
}

pub(crate) fn text(content: &str, style: TextStyle) -> TextProps {
    TextProps {
        text: content.to_string(),
        style,
        color: None,
    }
}
