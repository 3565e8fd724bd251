use eraline_protocol::{Entity, SharedStr};
use serde::{Deserialize, Serialize};

/// Colours assigned to categories without a configured one.
pub const CATEGORY_PALETTE: [&str; 10] = [
    "#6cae95", "#c79743", "#d87a53", "#8d9cd6", "#58a0b4", "#9a8bb7", "#b9866a", "#7aa1d2",
    "#d08d5d", "#79ab7b",
];

const DEFAULT_CATEGORIES: [(&str, &str, &str); 7] = [
    ("science", "Science", "#6cae95"),
    ("philosophy", "Philosophy", "#c79743"),
    ("politics", "Politics", "#d87a53"),
    ("art", "Art", "#8d9cd6"),
    ("exploration", "Exploration & space", "#58a0b4"),
    ("technology", "Technology", "#9a8bb7"),
    ("psychology", "Psychology", "#b9866a"),
];

/// Lowercase `text` and collapse every run of non-alphanumeric characters
/// into a single dash, trimming dashes at both ends.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for ch in text.trim().chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(ch.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Human-readable label for a category key: `"deep_sea-diving"` becomes
/// `"Deep sea diving"`.
pub fn label_from_key(key: &str) -> String {
    let words: Vec<&str> = key.split(['-', '_']).flat_map(str::split_whitespace).collect();
    let joined = words.join(" ");
    let mut chars = joined.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Deterministic palette colour for a key (31-multiplier string hash over
/// UTF-16 code units, wrapping at 32 bits).
pub fn pick_color(key: &str) -> &'static str {
    let hash = key.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit))
    });
    let index = i64::from(hash).unsigned_abs() % CATEGORY_PALETTE.len() as u64;
    CATEGORY_PALETTE[index as usize]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub label: String,
    pub color: String,
}

impl Category {
    fn derived(key: &str) -> Self {
        Self {
            label: label_from_key(key),
            color: pick_color(key).to_string(),
        }
    }
}

/// Ordered category table: defaults first, then keys in registration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRegistry {
    entries: Vec<(SharedStr, Category)>,
}

impl CategoryRegistry {
    /// Registry holding only the built-in categories.
    pub fn with_defaults() -> Self {
        let entries = DEFAULT_CATEGORIES
            .iter()
            .map(|&(key, label, color)| {
                (
                    SharedStr::from(key),
                    Category {
                        label: label.to_string(),
                        color: color.to_string(),
                    },
                )
            })
            .collect();
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&Category> {
        self.entries.iter().find(|(k, _)| k == &key).map(|(_, c)| c)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Category)> {
        self.entries.iter().map(|(k, c)| (k.as_str(), c))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Apply user-supplied labels. Keys are slugged; blank keys or labels
    /// are ignored. Existing entries keep their colour.
    pub fn merge_labels<'a>(&mut self, labels: impl IntoIterator<Item = (&'a str, &'a str)>) {
        for (key, label) in labels {
            let key = slugify(key);
            let label = label.trim();
            if key.is_empty() || label.is_empty() {
                continue;
            }
            match self.entries.iter_mut().find(|(k, _)| k == &key.as_str()) {
                Some((_, category)) => category.label = label.to_string(),
                None => {
                    let color = pick_color(&key).to_string();
                    self.entries.push((
                        SharedStr::from(key),
                        Category {
                            label: label.to_string(),
                            color,
                        },
                    ));
                }
            }
        }
    }

    /// Add a derived entry for every entity category not yet known.
    pub fn register_entities(&mut self, entities: &[Entity]) {
        for entity in entities {
            let key = slugify(&entity.category);
            if key.is_empty() || self.contains(&key) {
                continue;
            }
            let category = Category::derived(&key);
            self.entries.push((SharedStr::from(key), category));
        }
    }

    /// Label and colour for any category string, registered or not.
    pub fn meta(&self, category: &str) -> Category {
        let key = slugify(category);
        if let Some(found) = self.get(&key) {
            return found.clone();
        }
        let source = if key.is_empty() { category } else { key.as_str() };
        Category::derived(source)
    }
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
