use maud::{html, Markup};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Loading {
    Hidden,
    Spinner { caption: String },
}

impl Loading {
    pub fn spinner(caption: impl Into<String>) -> Self {
        Loading::Spinner {
            caption: caption.into(),
        }
    }

    pub fn render(&self) -> Markup {
        let Loading::Spinner { caption } = self else {
            return html! {};
        };
        html! {
            div.loading role="status" {
                span.loading__spinner {}
                p.loading__caption { (caption) }
            }
        }
    }
}
