//! Item records and localized text.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::CategoryKey;
use crate::constants::DEFAULT_LOCALE;

/// Unique identifier of an item, stable across re-filtering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Wraps an identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Text keyed by locale code (e.g. `"en"`, `"ar"`).
///
/// Missing or `null` locales are simply absent; a record with no text at all
/// deserializes to an empty value rather than failing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LocalizedText(BTreeMap<String, String>);

impl LocalizedText {
    /// Builder-style setter for one locale.
    pub fn with(mut self, locale: impl Into<String>, text: impl Into<String>) -> Self {
        self.0.insert(locale.into(), text.into());
        self
    }

    /// Returns the text for exactly `locale`.
    #[must_use]
    pub fn get(&self, locale: &str) -> Option<&str> {
        self.0.get(locale).map(String::as_str)
    }

    /// Returns the text for `locale`, falling back to the default locale and
    /// then to any locale present.
    #[must_use]
    pub fn display(&self, locale: &str) -> Option<&str> {
        self.get(locale)
            .or_else(|| self.get(DEFAULT_LOCALE))
            .or_else(|| self.0.values().next().map(String::as_str))
    }

    /// Iterates over `(locale, text)` pairs in locale order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns true when no locale has text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for LocalizedText {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<BTreeMap<String, Option<String>>>::deserialize(deserializer)?;
        Ok(Self(
            raw.unwrap_or_default()
                .into_iter()
                .filter_map(|(locale, text)| text.map(|text| (locale, text)))
                .collect(),
        ))
    }
}

/// Roast level of a coffee item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoastLevel {
    /// Light roast
    Light,
    /// Medium roast
    Medium,
    /// Dark roast
    Dark,
}

impl fmt::Display for RoastLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Light => write!(f, "light"),
            Self::Medium => write!(f, "medium"),
            Self::Dark => write!(f, "dark"),
        }
    }
}

/// An item record as supplied by the content store.
///
/// The view only looks at `id`, `category`, `name` and `description`; the
/// remaining fields are carried for presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Unique identifier
    pub id: ItemId,
    /// URL slug
    #[serde(default)]
    pub slug: Option<String>,
    /// Display name per locale
    #[serde(default)]
    pub name: LocalizedText,
    /// Description per locale
    #[serde(default)]
    pub description: LocalizedText,
    /// Category key; `None` means uncategorized
    #[serde(default, deserialize_with = "deserialize_category_ref")]
    pub category: Option<CategoryKey>,
    /// Unit price in the store currency
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: f64,
    /// Image URLs
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<String>,
    /// Average rating out of 5
    #[serde(default, deserialize_with = "null_as_default")]
    pub rating: f32,
    /// Featured on the storefront
    #[serde(default, deserialize_with = "null_as_default")]
    pub featured: bool,
    /// Currently in stock
    #[serde(default = "default_in_stock", deserialize_with = "null_as_in_stock")]
    pub in_stock: bool,
    /// Roast level, for coffee items
    #[serde(default)]
    pub roast_level: Option<RoastLevel>,
    /// Origin region
    #[serde(default)]
    pub origin: Option<String>,
    /// Creation timestamp in the content store
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

const fn default_in_stock() -> bool {
    true
}

// The content store projects unset optional fields as explicit nulls.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_in_stock<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or_else(default_in_stock))
}

/// Item category as it appears in documents: a bare key, or the dereferenced
/// category object carrying a `slug`.
#[derive(Deserialize)]
#[serde(untagged)]
enum CategoryRef {
    Key(String),
    Embedded { slug: Option<String> },
}

fn deserialize_category_ref<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<CategoryKey>, D::Error> {
    let raw = Option::<CategoryRef>::deserialize(deserializer)?;
    let key = match raw {
        Some(CategoryRef::Key(key)) => Some(key),
        Some(CategoryRef::Embedded { slug }) => slug,
        None => None,
    };

    // An unusable key leaves the item uncategorized; it still shows under "all".
    Ok(key.and_then(|key| match CategoryKey::new(key.clone()) {
        Ok(key) => Some(key),
        Err(e) => {
            tracing::warn!("Ignoring item category '{key}': {e}");
            None
        }
    }))
}

impl Item {
    /// Creates an uncategorized item with an English name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(id),
            slug: None,
            name: LocalizedText::default().with("en", name),
            description: LocalizedText::default(),
            category: None,
            price: 0.0,
            images: Vec::new(),
            rating: 0.0,
            featured: false,
            in_stock: true,
            roast_level: None,
            origin: None,
            created_at: None,
        }
    }

    /// Builder-style setter for the category key.
    pub fn in_category(mut self, key: CategoryKey) -> Self {
        self.category = Some(key);
        self
    }

    /// Builder-style setter for one locale of the name.
    pub fn named(mut self, locale: &str, text: impl Into<String>) -> Self {
        self.name = self.name.with(locale, text);
        self
    }

    /// Builder-style setter for one locale of the description.
    pub fn described(mut self, locale: &str, text: impl Into<String>) -> Self {
        self.description = self.description.with(locale, text);
        self
    }

    /// The localized fields searched by free-text queries.
    #[must_use]
    pub fn text_fields(&self) -> [&LocalizedText; 2] {
        [&self.name, &self.description]
    }

    /// Display name for `locale`, falling back to the id.
    #[must_use]
    pub fn title<'a>(&'a self, locale: &str) -> &'a str {
        self.name.display(locale).unwrap_or(self.id.as_str())
    }
}
