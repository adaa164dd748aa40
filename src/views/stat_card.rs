//! Titled single-value card.

use maud::{html, Markup, Render};

// ---

const DEFAULT_COLOR: &str = "#3b82f6";

/// Glyph shown in the card's icon bubble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Activity,
    Thermometer,
    Cloud,
    Droplet,
    Wind,
    Gauge,
}

impl Icon {
    pub fn glyph(self) -> &'static str {
        // ---
        match self {
            Icon::Activity => "⚡",
            Icon::Thermometer => "🌡",
            Icon::Cloud => "☁",
            Icon::Droplet => "💧",
            Icon::Wind => "🌬",
            Icon::Gauge => "⏲",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SecondaryValue {
    pub label: Option<String>,
    pub value: String,
    pub unit: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trend {
    pub value: f64,
    pub label: String,
    pub is_positive: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatCard {
    title: String,
    value: String,
    icon: Icon,
    color: Option<String>,
    unit: Option<String>,
    description: Option<String>,
    secondary: Option<SecondaryValue>,
    trend: Option<Trend>,
    accent: Option<&'static str>,
}

impl StatCard {
    pub fn new(title: impl Into<String>, value: impl Into<String>, icon: Icon) -> Self {
        // ---
        Self {
            title: title.into(),
            value: value.into(),
            icon,
            color: None,
            unit: None,
            description: None,
            secondary: None,
            trend: None,
            accent: None,
        }
    }

    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn secondary(mut self, secondary: SecondaryValue) -> Self {
        self.secondary = Some(secondary);
        self
    }

    pub fn trend(mut self, trend: Trend) -> Self {
        self.trend = Some(trend);
        self
    }

    /// Extra CSS class for the card background tint.
    pub fn accent(mut self, class: &'static str) -> Self {
        self.accent = Some(class);
        self
    }
}

impl Render for StatCard {
    fn render(&self) -> Markup {
        // ---
        let color = self.color.as_deref().unwrap_or(DEFAULT_COLOR);
        let has_footer = self.description.is_some() || self.trend.is_some();

        html! {
            div class={ "card stat-card " (self.accent.unwrap_or("")) } {
                div.stat-top {
                    span.stat-title { (self.title) }
                    // Icon bubble uses the theme color at ~8% alpha.
                    div.stat-icon style={ "background-color:" (color) "15;color:" (color) } {
                        (self.icon.glyph())
                    }
                }
                div.stat-main {
                    span.stat-value data-animate style={ "color:" (color) } { (self.value) }
                    @if let Some(unit) = &self.unit {
                        span.stat-unit { (unit) }
                    }
                }
                @if let Some(secondary) = &self.secondary {
                    div.stat-secondary {
                        span.strong {
                            @if let Some(label) = &secondary.label { (label) ": " }
                            (secondary.value)
                        }
                        @if let Some(unit) = &secondary.unit {
                            span.stat-unit { (unit) }
                        }
                    }
                }
                @if has_footer {
                    div.stat-foot {
                        @if let Some(description) = &self.description {
                            span.muted { (description) }
                        }
                        @if let Some(trend) = &self.trend {
                            span.trend.up[trend.is_positive].down[!trend.is_positive] {
                                (if trend.is_positive { "↑ " } else { "↓ " })
                                (trend.value)
                                (trend.label)
                            }
                        }
                    }
                }
            }
        }
    }
}
