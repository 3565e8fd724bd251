use eraline_protocol::Entity;
use serde::{Deserialize, Serialize};

use super::catalog::{CategoryRegistry, slugify};

/// Free-text search plus an optional category restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityFilter {
    pub query: String,
    /// Category key; `None` means all categories.
    pub category: Option<String>,
}

impl EntityFilter {
    pub fn new(query: impl Into<String>, category: Option<String>) -> Self {
        Self {
            query: query.into(),
            category: category.map(|c| slugify(&c)).filter(|c| !c.is_empty()),
        }
    }

    /// Drop a category restriction that names an unknown category.
    pub fn sanitize(&mut self, registry: &CategoryRegistry) {
        if self
            .category
            .as_deref()
            .is_some_and(|key| !registry.contains(key))
        {
            self.category = None;
        }
    }

    pub fn matches(&self, entity: &Entity, registry: &CategoryRegistry) -> bool {
        let key = slugify(&entity.category);
        if let Some(wanted) = &self.category
            && *wanted != key
        {
            return false;
        }

        let query = self.query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }

        let label = registry.meta(&key).label;
        let achievements = entity.achievements.join(" ");
        let haystack = [
            entity.name.as_str(),
            label.as_str(),
            entity.summary.as_str(),
            achievements.as_str(),
        ]
        .join(" ")
        .to_lowercase();
        haystack.contains(&query)
    }

    /// Matching entities sorted stably by birth year.
    pub fn apply<'a>(&self, entities: &'a [Entity], registry: &CategoryRegistry) -> Vec<&'a Entity> {
        let mut matched: Vec<&Entity> = entities
            .iter()
            .filter(|e| self.matches(e, registry))
            .collect();
        matched.sort_by_key(|e| e.birth_year);
        matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eraline_protocol::Lifespan;

    fn dataset() -> Vec<Entity> {
        let mut curie = Entity::new("curie", "Marie Curie", "science", 1867, Lifespan::Fixed(1934));
        curie.achievements = vec!["Discovered polonium".into()];
        let mut kant = Entity::new("kant", "Immanuel Kant", "philosophy", 1724, Lifespan::Fixed(1804));
        kant.summary = "Critique of Pure Reason".into();
        let newton = Entity::new("newton", "Isaac Newton", "science", 1643, Lifespan::Fixed(1727));
        vec![curie, kant, newton]
    }

    fn ids(matched: &[&Entity]) -> Vec<String> {
        matched.iter().map(|e| e.id.to_string()).collect()
    }

    #[test]
    fn empty_filter_sorts_by_birth() {
        let registry = CategoryRegistry::with_defaults();
        let entities = dataset();
        let matched = EntityFilter::default().apply(&entities, &registry);
        assert_eq!(ids(&matched), vec!["newton", "kant", "curie"]);
    }

    #[test]
    fn category_restricts() {
        let registry = CategoryRegistry::with_defaults();
        let entities = dataset();
        let filter = EntityFilter::new("", Some("Science".into()));
        assert_eq!(ids(&filter.apply(&entities, &registry)), vec!["newton", "curie"]);
    }

    #[test]
    fn query_searches_summary_achievements_and_label() {
        let registry = CategoryRegistry::with_defaults();
        let entities = dataset();
        let by_achievement = EntityFilter::new("POLONIUM", None);
        assert_eq!(ids(&by_achievement.apply(&entities, &registry)), vec!["curie"]);
        let by_summary = EntityFilter::new("  pure reason ", None);
        assert_eq!(ids(&by_summary.apply(&entities, &registry)), vec!["kant"]);
        let by_label = EntityFilter::new("philosophy", None);
        assert_eq!(ids(&by_label.apply(&entities, &registry)), vec!["kant"]);
    }

    #[test]
    fn sanitize_resets_unknown_category() {
        let registry = CategoryRegistry::with_defaults();
        let mut filter = EntityFilter::new("", Some("alchemy".into()));
        filter.sanitize(&registry);
        assert_eq!(filter.category, None);

        let mut known = EntityFilter::new("", Some("art".into()));
        known.sanitize(&registry);
        assert_eq!(known.category.as_deref(), Some("art"));
    }
}
