use crate::database::models::{DemandesStats, DocumentsStats, StagiairesStats};

use maud::{html, Markup, PreEscaped, DOCTYPE};

use super::{Footer, Loading, StatCard};

/// Dashboard sections with a stats fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsDomain {
    Demandes,
    Documents,
    Stagiaires,
}

impl StatsDomain {
    pub const ALL: [StatsDomain; 3] = [StatsDomain::Stagiaires, StatsDomain::Demandes, StatsDomain::Documents];

    pub fn parse(segment: &str) -> Option<Self> {
        match segment {
            "demandes" => Some(StatsDomain::Demandes),
            "documents" => Some(StatsDomain::Documents),
            "stagiaires" => Some(StatsDomain::Stagiaires),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatsDomain::Demandes => "demandes",
            StatsDomain::Documents => "documents",
            StatsDomain::Stagiaires => "stagiaires",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            StatsDomain::Demandes => "Demandes",
            StatsDomain::Documents => "Documents",
            StatsDomain::Stagiaires => "Stagiaires",
        }
    }
}

pub fn demandes_cards(stats: &DemandesStats) -> Vec<StatCard> {
    vec![
        StatCard::new("Total", stats.total),
        StatCard::new("En attente", stats.en_attente).with_icon("⏳"),
        StatCard::new("Approuvées", stats.approuvees).with_icon("✔"),
        StatCard::new("Rejetées", stats.rejetees).with_icon("✖"),
    ]
}

pub fn documents_cards(stats: &DocumentsStats) -> Vec<StatCard> {
    let mut cards = vec![
        StatCard::new("Total", stats.total),
        StatCard::new("Ce mois", stats.ce_mois).with_icon("📄"),
    ];
    cards.extend(stats.par_statut.iter().map(|(statut, count)| StatCard::new(statut.as_str(), *count)));
    cards
}

pub fn stagiaires_cards(stats: &StagiairesStats) -> Vec<StatCard> {
    vec![
        StatCard::new("Total", stats.total),
        StatCard::new("Actifs", stats.actifs).with_icon("🎓"),
        StatCard::new("En attente", stats.en_attente),
        StatCard::new("Terminés", stats.termines),
        StatCard::new("Abandons", stats.abandonnes),
        StatCard::new("Sans tuteur", stats.sans_tuteur).with_icon("⚠"),
    ]
}

/// Cards for one dashboard section
pub fn stats_fragment(domain: StatsDomain, cards: &[StatCard]) -> Markup {
    html! {
        section.stats id={ "stats-" (domain.as_str()) } {
            h2 { (domain.title()) }
            div.stats__grid {
                @for card in cards {
                    (card)
                }
            }
        }
    }
}

const SLOT_LOADER: &str = r#"document.querySelectorAll('.stats-slot').forEach(function (slot) {
  fetch(slot.dataset.src).then(function (r) { return r.ok ? r.text() : ''; }).then(function (html) { slot.innerHTML = html; });
});"#;

/// Admin shell. Each section starts as a spinner and is replaced by the
/// fragment served at `data-src`.
pub fn index_page(title: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="fr" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
            }
            body {
                main {
                    h1 { (title) }
                    @for domain in StatsDomain::ALL {
                        div.stats-slot data-src={ "/partials/stats/" (domain.as_str()) } {
                            (Loading::spinner(format!("Chargement des {}…", domain.as_str())).render())
                        }
                    }
                }
                (Footer::render())
                script { (PreEscaped(SLOT_LOADER)) }
            }
        }
    }
}
