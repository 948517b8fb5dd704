//! Game discovery page: category filter, name search and suggestions.

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GameCard {
    pub name: String,
    /// Raw category attribute, e.g. `"action multijoueur"`.
    #[serde(default)]
    pub categories: String,
}

impl GameCard {
    pub fn new(name: impl Into<String>, categories: impl Into<String>) -> Self {
        Self { name: name.into(), categories: categories.into() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// `"all"` (or nothing) shows every category.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") | Some("all") => CategoryFilter::All,
            Some(category) => CategoryFilter::Only(category.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    pub category: CategoryFilter,
    pub search: String,
}

impl CatalogFilter {
    pub fn new(category: CategoryFilter, search: impl Into<String>) -> Self {
        Self { category, search: search.into() }
    }

    pub fn matches(&self, card: &GameCard) -> bool {
        if let CategoryFilter::Only(category) = &self.category {
            if !card.categories.contains(category.as_str()) {
                return false;
            }
        }
        let search = self.search.trim();
        search.is_empty() || card.name.to_lowercase().contains(&search.to_lowercase())
    }

    /// Indices of the cards that stay visible, in page order.
    pub fn visible(&self, cards: &[GameCard]) -> Vec<usize> {
        cards
            .iter()
            .enumerate()
            .filter(|(_, card)| self.matches(card))
            .map(|(i, _)| i)
            .collect()
    }
}

pub fn results_label(count: usize) -> String {
    if count > 1 {
        format!("{count} jeux trouvés")
    } else {
        format!("{count} jeu trouvé")
    }
}

/// Lowercased names containing `query`; nothing for an empty query.
pub fn suggestions(cards: &[GameCard], query: &str) -> Vec<String> {
    let query = query.to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }
    cards
        .iter()
        .map(|card| card.name.to_lowercase())
        .filter(|name| name.contains(&query))
        .collect()
}
