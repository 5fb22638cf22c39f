use std::fmt;

/// The closed set of component types the engine knows how to draw.
///
/// Anything else is kept verbatim in `Unknown` so it can be reported
/// back in a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ComponentType {
    Column,
    Row,
    Text,
    Button,
    Image,
    Spacer,
    Card,
    ScrollableColumn,
    LazyColumn,
    LazyRow,
    EnhancedLazyColumn,
    LazyGrid,
    TopAppBar,
    ProgressIndicator,
    Chart(ChartKind),
    Unknown(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
    Bubble,
    Radar,
}

impl ChartKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Bar => "bar_chart",
            ChartKind::Line => "line_chart",
            ChartKind::Pie => "pie_chart",
            ChartKind::Bubble => "bubble_chart",
            ChartKind::Radar => "radar_chart",
        }
    }

    /// The property a chart of this kind draws from.
    pub fn data_property(&self) -> &'static str {
        match self {
            ChartKind::Line => "series",
            _ => "data",
        }
    }
}

impl ComponentType {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "column" => ComponentType::Column,
            "row" => ComponentType::Row,
            "text" => ComponentType::Text,
            "button" => ComponentType::Button,
            "image" => ComponentType::Image,
            "spacer" => ComponentType::Spacer,
            "card" => ComponentType::Card,
            "scrollable_column" => ComponentType::ScrollableColumn,
            "lazy_column" => ComponentType::LazyColumn,
            "lazy_row" => ComponentType::LazyRow,
            "enhanced_lazy_column" => ComponentType::EnhancedLazyColumn,
            "lazy_grid" => ComponentType::LazyGrid,
            "top_app_bar" => ComponentType::TopAppBar,
            "progress_indicator" => ComponentType::ProgressIndicator,
            "bar_chart" => ComponentType::Chart(ChartKind::Bar),
            "line_chart" => ComponentType::Chart(ChartKind::Line),
            "pie_chart" => ComponentType::Chart(ChartKind::Pie),
            "bubble_chart" => ComponentType::Chart(ChartKind::Bubble),
            "radar_chart" => ComponentType::Chart(ChartKind::Radar),
            other => ComponentType::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ComponentType::Column => "column",
            ComponentType::Row => "row",
            ComponentType::Text => "text",
            ComponentType::Button => "button",
            ComponentType::Image => "image",
            ComponentType::Spacer => "spacer",
            ComponentType::Card => "card",
            ComponentType::ScrollableColumn => "scrollable_column",
            ComponentType::LazyColumn => "lazy_column",
            ComponentType::LazyRow => "lazy_row",
            ComponentType::EnhancedLazyColumn => "enhanced_lazy_column",
            ComponentType::LazyGrid => "lazy_grid",
            ComponentType::TopAppBar => "top_app_bar",
            ComponentType::ProgressIndicator => "progress_indicator",
            ComponentType::Chart(kind) => kind.as_str(),
            ComponentType::Unknown(tag) => tag,
        }
    }

    pub fn is_lazy(&self) -> bool {
        matches!(
            self,
            ComponentType::LazyColumn
                | ComponentType::LazyRow
                | ComponentType::EnhancedLazyColumn
                | ComponentType::LazyGrid
        )
    }

    pub fn is_chart(&self) -> bool {
        matches!(self, ComponentType::Chart(_))
    }

    /// Types whose `children` are compiled and drawn.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            ComponentType::Column
                | ComponentType::Row
                | ComponentType::Card
                | ComponentType::ScrollableColumn
        )
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
