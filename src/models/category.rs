//! Category records and the category filter key.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::LocalizedText;
use crate::constants::ALL_CATEGORIES;

/// Key of a real category (the `slug` in catalog documents).
///
/// # Validation
///
/// - Must be non-empty
/// - Must not be the reserved key `"all"`, which only exists as a filter
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CategoryKey(String);

impl CategoryKey {
    /// Creates a category key with validation.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazyshelf::models::CategoryKey;
    ///
    /// assert!(CategoryKey::new("coffee").is_ok());
    /// assert!(CategoryKey::new("all").is_err());
    /// ```
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        Self::validate(&key)?;
        Ok(Self(key))
    }

    fn validate(key: &str) -> Result<()> {
        if key.trim().is_empty() {
            anyhow::bail!("Category key cannot be empty");
        }

        if key == ALL_CATEGORIES {
            anyhow::bail!("Category key '{ALL_CATEGORIES}' is reserved for the all-items filter");
        }

        Ok(())
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CategoryKey {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<CategoryKey> for String {
    fn from(key: CategoryKey) -> Self {
        key.0
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Category selected in the filter bar: everything, or one concrete key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CategoryFilter {
    /// Matches every item, categorized or not
    #[default]
    All,
    /// Matches items whose category key equals this key
    Only(CategoryKey),
}

impl CategoryFilter {
    /// Parses a filter key; `"all"` (and anything that is not a valid key) selects everything.
    #[must_use]
    pub fn parse(key: &str) -> Self {
        CategoryKey::new(key).map_or(Self::All, Self::Only)
    }

    /// Returns true for the `"all"` filter.
    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Returns the filter's key as it appears in URLs and CLI flags.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL_CATEGORIES,
            Self::Only(key) => key.as_str(),
        }
    }
}

impl From<String> for CategoryFilter {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<CategoryFilter> for String {
    fn from(filter: CategoryFilter) -> Self {
        filter.as_str().to_string()
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A category record as supplied by the content store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Content store document id
    #[serde(default)]
    pub id: String,
    /// Unique key items refer to
    #[serde(rename = "slug")]
    pub key: CategoryKey,
    /// Display labels per locale
    #[serde(default)]
    pub name: LocalizedText,
    /// Optional longer description per locale
    #[serde(default)]
    pub description: LocalizedText,
    /// Optional image URL
    #[serde(default)]
    pub image: Option<String>,
    /// Sort position in the filter bar (ascending, unset sorts last)
    #[serde(default)]
    pub order: Option<i32>,
}

impl Category {
    /// Creates a category with a single English label.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Result<Self> {
        let key = CategoryKey::new(key)?;
        Ok(Self {
            id: key.as_str().to_string(),
            key,
            name: LocalizedText::default().with("en", label),
            description: LocalizedText::default(),
            image: None,
            order: None,
        })
    }

    /// Returns the label for `locale`, falling back to the key itself.
    #[must_use]
    pub fn label<'a>(&'a self, locale: &str) -> &'a str {
        self.name.display(locale).unwrap_or(self.key.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_rejects_reserved_and_empty() {
        assert!(CategoryKey::new("coffee").is_ok());
        assert!(CategoryKey::new("all").is_err());
        assert!(CategoryKey::new("").is_err());
        assert!(CategoryKey::new("   ").is_err());
    }

    #[test]
    fn test_filter_parse() {
        assert_eq!(CategoryFilter::parse("all"), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::parse("tea"),
            CategoryFilter::Only(CategoryKey::new("tea").unwrap())
        );
        assert_eq!(CategoryFilter::parse(""), CategoryFilter::All);
        assert!(CategoryFilter::default().is_all());
    }

    #[test]
    fn test_filter_serde_as_string() {
        let filter = CategoryFilter::parse("beans");
        let json = serde_json::to_string(&filter).unwrap();
        assert_eq!(json, "\"beans\"");

        let back: CategoryFilter = serde_json::from_str("\"all\"").unwrap();
        assert_eq!(back, CategoryFilter::All);
    }

    #[test]
    fn test_category_deserialize_uses_slug() {
        let json = r#"{"id": "c1", "slug": "beans", "name": {"en": "Beans", "ar": "حبوب"}, "order": 2}"#;
        let category: Category = serde_json::from_str(json).unwrap();
        assert_eq!(category.key.as_str(), "beans");
        assert_eq!(category.label("ar"), "حبوب");
        assert_eq!(category.order, Some(2));
    }

    #[test]
    fn test_category_with_reserved_slug_fails() {
        let json = r#"{"id": "c1", "slug": "all"}"#;
        assert!(serde_json::from_str::<Category>(json).is_err());
    }

    #[test]
    fn test_label_falls_back_to_key() {
        let mut category = Category::new("beans", "Beans").unwrap();
        category.name = LocalizedText::default();
        assert_eq!(category.label("en"), "beans");
    }
}
