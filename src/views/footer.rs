use maud::{html, Markup};

/// Site footer; has no inputs
pub struct Footer;

impl Footer {
    pub fn render() -> Markup {
        html! {
            footer.site-footer {
                p { "Gestion des stagiaires · v" (env!("CARGO_PKG_VERSION")) }
                nav {
                    a href="/api" { "API" }
                    " · "
                    a href="/health" { "Statut" }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Footer;

    #[test]
    fn footer_is_constant() {
        let html = Footer::render().into_string();
        assert_eq!(html, Footer::render().into_string());
        assert!(html.starts_with(r#"<footer class="site-footer">"#));
        assert!(html.contains(env!("CARGO_PKG_VERSION")));
    }
}
