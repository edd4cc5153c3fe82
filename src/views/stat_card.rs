use maud::{html, Markup, Render};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Trend {
    Up(String),
    Down(String),
    Flat,
}

/// One dashboard figure. Rendering is a pure function of the fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StatCard {
    pub label: String,
    pub value: String,
    pub icon: Option<String>,
    pub trend: Option<Trend>,
}

impl StatCard {
    pub fn new(label: impl Into<String>, value: impl ToString) -> Self {
        Self {
            label: label.into(),
            value: value.to_string(),
            icon: None,
            trend: None,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_trend(mut self, trend: Trend) -> Self {
        self.trend = Some(trend);
        self
    }
}

impl Render for StatCard {
    fn render(&self) -> Markup {
        html! {
            div.stat-card {
                @if let Some(icon) = &self.icon {
                    span.stat-card__icon aria-hidden="true" { (icon) }
                }
                p.stat-card__label { (self.label) }
                p.stat-card__value { (self.value) }
                @match &self.trend {
                    Some(Trend::Up(delta)) => {
                        p class="stat-card__trend stat-card__trend--up" { "▲ " (delta) }
                    }
                    Some(Trend::Down(delta)) => {
                        p class="stat-card__trend stat-card__trend--down" { "▼ " (delta) }
                    }
                    Some(Trend::Flat) => { p.stat-card__trend { "=" } }
                    None => {}
                }
            }
        }
    }
}
