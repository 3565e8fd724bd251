use eraline_protocol::{Entity, Lifespan, SharedStr, Year};
use serde::Deserialize;
use serde_json::Value;

use crate::model::catalog::slugify;

pub const DEFAULT_CATEGORY: &str = "science";

/// Death-date strings that mark a lifespan as ongoing.
const ONGOING_MARKERS: [&str; 2] = ["present", "по н.в."];

/// One person record as found in exported datasets.
///
/// Field names follow either the camelCase export or the snake_case table
/// columns; numbers may arrive as strings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawRecord {
    pub id: Option<String>,
    pub slug: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    #[serde(alias = "birthYear")]
    pub birth_year: Option<Value>,
    #[serde(alias = "deathYear")]
    pub death_year: Option<Value>,
    #[serde(alias = "deathDate")]
    pub death_date: Option<String>,
    #[serde(alias = "isLiving")]
    pub is_living: Option<bool>,
    pub summary: Option<String>,
    pub achievements: Option<Value>,
    #[serde(alias = "wikiTitle")]
    pub wiki_title: Option<String>,
}

/// Parse a year from a JSON number or numeric string. Fractional years are
/// truncated toward zero.
pub fn parse_year(value: &Value) -> Option<Year> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !number.is_finite() || number < f64::from(Year::MIN) || number > f64::from(Year::MAX) {
        return None;
    }
    Some(number.trunc() as Year)
}

/// Normalize an achievements field: an array, a JSON array inside a
/// string, or a newline/semicolon separated list.
pub fn parse_achievements(value: &Value) -> Vec<String> {
    fn clean<'a>(items: impl Iterator<Item = &'a str>) -> Vec<String> {
        items
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }

    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .filter(|s| !s.is_empty())
            .collect(),
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.starts_with('[')
                && let Ok(Value::Array(items)) = serde_json::from_str::<Value>(trimmed)
            {
                return parse_achievements(&Value::Array(items));
            }
            clean(trimmed.split(['\n', ';']))
        }
        _ => Vec::new(),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

impl RawRecord {
    fn is_ongoing(&self) -> bool {
        self.is_living.unwrap_or(false)
            || non_empty(self.death_date.as_deref())
                .is_some_and(|date| ONGOING_MARKERS.iter().any(|m| date.eq_ignore_ascii_case(m)))
    }

    /// Best-effort id before uniqueness is enforced.
    fn base_id(&self, index: usize) -> String {
        non_empty(self.id.as_deref())
            .or_else(|| non_empty(self.slug.as_deref()))
            .map(String::from)
            .or_else(|| {
                let slug = slugify(self.name.as_deref().unwrap_or_default());
                (!slug.is_empty()).then_some(slug)
            })
            .unwrap_or_else(|| format!("entity-{index}"))
    }

    /// Convert into an [`Entity`]; `None` when the birth year is missing or
    /// not a number. `id` must already be unique.
    pub fn into_entity(self, id: String) -> Option<Entity> {
        let birth_year = self.birth_year.as_ref().and_then(parse_year)?;
        let lifespan = if self.is_ongoing() {
            Lifespan::Ongoing
        } else {
            Lifespan::Fixed(
                self.death_year
                    .as_ref()
                    .and_then(parse_year)
                    .unwrap_or(birth_year),
            )
        };

        let category = non_empty(self.category.as_deref()).unwrap_or(DEFAULT_CATEGORY);
        let mut entity = Entity::new(
            id,
            non_empty(self.name.as_deref()).unwrap_or_default(),
            SharedStr::from(category),
            birth_year,
            lifespan,
        );
        entity.summary = non_empty(self.summary.as_deref())
            .unwrap_or_default()
            .to_string();
        entity.achievements = self
            .achievements
            .as_ref()
            .map(parse_achievements)
            .unwrap_or_default();
        entity.wiki_title = non_empty(self.wiki_title.as_deref()).map(String::from);
        Some(entity)
    }
}

/// Assigns unique ids, suffixing duplicates with `-2`, `-3`, ...
#[derive(Debug, Default)]
pub struct IdAllocator {
    taken: std::collections::HashSet<String>,
}

impl IdAllocator {
    pub fn allocate(&mut self, record: &RawRecord, index: usize) -> String {
        let base = record.base_id(index);
        let mut candidate = base.clone();
        let mut suffix = 2;
        while self.taken.contains(&candidate) {
            candidate = format!("{base}-{suffix}");
            suffix += 1;
        }
        self.taken.insert(candidate.clone());
        candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> RawRecord {
        serde_json::from_value(value).unwrap_or_default()
    }

    #[test]
    fn parses_years_from_numbers_and_strings() {
        assert_eq!(parse_year(&json!(1643)), Some(1643));
        assert_eq!(parse_year(&json!("-384")), Some(-384));
        assert_eq!(parse_year(&json!(" 1727 ")), Some(1727));
        assert_eq!(parse_year(&json!(1999.7)), Some(1999));
        assert_eq!(parse_year(&json!("soon")), None);
        assert_eq!(parse_year(&json!(null)), None);
    }

    #[test]
    fn achievements_accept_several_shapes() {
        assert_eq!(parse_achievements(&json!(["a", " b ", ""])), vec!["a", "b"]);
        assert_eq!(parse_achievements(&json!("[\"x\", \"y\"]")), vec!["x", "y"]);
        assert_eq!(parse_achievements(&json!("one;two\nthree")), vec!["one", "two", "three"]);
        assert!(parse_achievements(&json!(42)).is_empty());
    }

    #[test]
    fn living_flag_wins_over_death_year() {
        let raw = record(json!({"name": "A", "birth_year": 1950, "death_year": 1990, "is_living": true}));
        let entity = raw.into_entity("a".into());
        assert_eq!(entity.map(|e| e.lifespan), Some(Lifespan::Ongoing));
    }

    #[test]
    fn ongoing_marker_in_death_date() {
        let raw = record(json!({"name": "A", "birthYear": 1950, "deathDate": "по н.в."}));
        assert_eq!(raw.into_entity("a".into()).map(|e| e.lifespan), Some(Lifespan::Ongoing));
    }

    #[test]
    fn missing_death_year_defaults_to_birth() {
        let raw = record(json!({"name": "A", "birthYear": "1800"}));
        assert_eq!(
            raw.into_entity("a".into()).map(|e| e.lifespan),
            Some(Lifespan::Fixed(1800))
        );
    }

    #[test]
    fn missing_birth_year_is_rejected() {
        let raw = record(json!({"name": "Nobody"}));
        assert!(raw.into_entity("n".into()).is_none());
    }

    #[test]
    fn category_defaults() {
        let raw = record(json!({"name": "A", "birth_year": 1, "category": "  "}));
        assert_eq!(
            raw.into_entity("a".into()).map(|e| e.category.to_string()),
            Some(DEFAULT_CATEGORY.to_string())
        );
    }

    #[test]
    fn ids_fall_back_and_stay_unique() {
        let mut ids = IdAllocator::default();
        let by_name = record(json!({"name": "Marie Curie"}));
        let by_slug = record(json!({"slug": "marie-curie"}));
        let anonymous = record(json!({}));
        assert_eq!(ids.allocate(&by_name, 0), "marie-curie");
        assert_eq!(ids.allocate(&by_slug, 1), "marie-curie-2");
        assert_eq!(ids.allocate(&anonymous, 2), "entity-2");
    }
}
