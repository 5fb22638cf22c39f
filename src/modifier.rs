use crate::node::{Color, Gradient, Modifier};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EdgeInsets {
    pub start: f64,
    pub top: f64,
    pub end: f64,
    pub bottom: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientKind {
    Linear,
    Radial,
    Sweep,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedGradient {
    pub kind: GradientKind,
    pub colors: Vec<Color>,
    pub angle: f64,
    pub start: (f64, f64),
    pub end: (f64, f64),
    pub radius: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Background {
    Solid(Color),
    Gradient(ResolvedGradient),
}

/// Concrete layout constraints handed to the backend.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedModifier {
    pub padding: EdgeInsets,
    pub fill_width: bool,
    pub fill_height: bool,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub background: Option<Background>,
}

impl ResolvedModifier {
    /// The same constraints without the flex weight. A weighted child is
    /// drawn inside its parent's weighted slot, which already applies it.
    pub fn without_weight(&self) -> Self {
        Self {
            weight: None,
            ..self.clone()
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == ResolvedModifier::default()
    }
}

/// Resolves a declarative modifier. An absent modifier resolves to identity.
///
/// Padding per edge prefers the explicit edge, then the axis value, then
/// the uniform `padding`.
pub fn resolve(modifier: Option<&Modifier>) -> ResolvedModifier {
    let Some(m) = modifier else {
        return ResolvedModifier::default();
    };

    let horizontal = m.padding_horizontal.or(m.padding);
    let vertical = m.padding_vertical.or(m.padding);
    let padding = EdgeInsets {
        start: m.padding_start.or(horizontal).unwrap_or(0.0),
        top: m.padding_top.or(vertical).unwrap_or(0.0),
        end: m.padding_end.or(horizontal).unwrap_or(0.0),
        bottom: m.padding_bottom.or(vertical).unwrap_or(0.0),
    };

    let fill_size = m.fill_max_size.unwrap_or(false);
    let background = match (&m.gradient, &m.background_color) {
        (Some(gradient), _) => resolve_gradient(gradient).map(Background::Gradient),
        (None, Some(color)) => Color::parse(color).map(Background::Solid),
        (None, None) => None,
    };

    ResolvedModifier {
        padding,
        fill_width: fill_size || m.fill_max_width.unwrap_or(false),
        fill_height: fill_size,
        width: m.width,
        height: m.height,
        weight: m.weight.filter(|w| *w > 0.0),
        background,
    }
}

fn resolve_gradient(gradient: &Gradient) -> Option<ResolvedGradient> {
    let colors: Vec<Color> = gradient
        .colors
        .iter()
        .filter_map(|c| Color::parse(c))
        .collect();
    // A gradient needs at least two stops.
    if colors.len() < 2 {
        return None;
    }
    let kind = match gradient.gradient_type.as_str() {
        "radial" => GradientKind::Radial,
        "sweep" => GradientKind::Sweep,
        _ => GradientKind::Linear,
    };
    Some(ResolvedGradient {
        kind,
        colors,
        angle: gradient.angle.unwrap_or(0.0),
        start: (
            gradient.start_x.unwrap_or(0.0),
            gradient.start_y.unwrap_or(0.0),
        ),
        end: (
            gradient.end_x.unwrap_or(f64::INFINITY),
            gradient.end_y.unwrap_or(f64::INFINITY),
        ),
        radius: gradient.radius,
    })
}
