use serde::{Deserialize, Serialize};

use crate::shared_str::SharedStr;

/// A signed calendar year. Negative values are BCE.
pub type Year = i32;

/// How a lifespan ends.
///
/// `Ongoing` stays symbolic in stored data and is only resolved against a
/// caller-supplied current year when a layout is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "year", rename_all = "snake_case")]
pub enum Lifespan {
    Fixed(Year),
    Ongoing,
}

impl Lifespan {
    /// Last year covered, with `Ongoing` pinned to `current_year`.
    pub fn end_year(self, current_year: Year) -> Year {
        match self {
            Self::Fixed(year) => year,
            Self::Ongoing => current_year,
        }
    }
}

/// A named, time-bounded record placed on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Unique identifier within one dataset.
    pub id: SharedStr,
    pub name: SharedStr,
    /// Category key (slug form, e.g. `"science"`).
    pub category: SharedStr,
    pub birth_year: Year,
    pub lifespan: Lifespan,
    /// Free-text description, searched by the entity filter.
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wiki_title: Option<String>,
}

impl Entity {
    pub fn new(
        id: impl Into<SharedStr>,
        name: impl Into<SharedStr>,
        category: impl Into<SharedStr>,
        birth_year: Year,
        lifespan: Lifespan,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            birth_year,
            lifespan,
            summary: String::new(),
            achievements: Vec::new(),
            wiki_title: None,
        }
    }

    /// Resolved end year of this entity's lifespan.
    pub fn end_year(&self, current_year: Year) -> Year {
        self.lifespan.end_year(current_year)
    }

    /// Whether the resolved span runs backwards (end before birth).
    pub fn is_inverted(&self, current_year: Year) -> bool {
        self.end_year(current_year) < self.birth_year
    }

    /// Short display string such as `"384 BCE – 322 BCE"` or `"1950 – present"`.
    pub fn years_label(&self) -> String {
        match self.lifespan {
            Lifespan::Fixed(death) => {
                format!("{} – {}", format_year(self.birth_year), format_year(death))
            }
            Lifespan::Ongoing => format!("{} – present", format_year(self.birth_year)),
        }
    }
}

/// Format a year for axis labels and readouts.
pub fn format_year(year: Year) -> String {
    if year < 0 {
        format!("{} BCE", year.unsigned_abs())
    } else {
        year.to_string()
    }
}
