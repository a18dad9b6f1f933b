use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::sync::LazyLock;

/// Backend identifier. The API has served both UUID strings and integer keys,
/// so either JSON form is accepted and kept as text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        Ok(match Option::<Value>::deserialize(d)? {
            Some(Value::String(s)) => Id(s),
            Some(Value::Number(n)) => Id(n.to_string()),
            _ => Id::default(),
        })
    }
}

pub type FranchiseId = Id;

/// Franchise category. Unknown keys are kept rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    Movies,
    Series,
    Books,
    Games,
    Anime,
    Music,
    Cars,
    Other(String),
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Movies,
        Category::Series,
        Category::Books,
        Category::Games,
        Category::Anime,
        Category::Music,
        Category::Cars,
    ];

    pub fn from_key(key: &str) -> Self {
        match key {
            "movies" => Self::Movies,
            "series" => Self::Series,
            "books" => Self::Books,
            "games" => Self::Games,
            "anime" => Self::Anime,
            "music" => Self::Music,
            "cars" => Self::Cars,
            other => Self::Other(other.to_string()),
        }
    }

    /// URL key, as used in `/api/categories/{key}/franchises` and `/{key}`.
    pub fn key(&self) -> &str {
        match self {
            Self::Movies => "movies",
            Self::Series => "series",
            Self::Books => "books",
            Self::Games => "games",
            Self::Anime => "anime",
            Self::Music => "music",
            Self::Cars => "cars",
            Self::Other(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Movies => "Movies",
            Self::Series => "Series",
            Self::Books => "Books",
            Self::Games => "Games",
            Self::Anime => "Anime",
            Self::Music => "Music",
            Self::Cars => "Cars",
            Self::Other(raw) => raw,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Movies => "🎬",
            Self::Series => "📺",
            Self::Books => "📚",
            Self::Games => "🎮",
            Self::Anime => "🎌",
            Self::Music => "🎵",
            Self::Cars => "🚗",
            Self::Other(_) => "📁",
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.key())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = lenient_string(d)?;
        Ok(Self::from_key(&raw))
    }
}

/// Marketplace an affiliate link points at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Platform {
    AmazonUk,
    AmazonUs,
    Spotify,
    Itunes,
    Steam,
    #[default]
    Other,
}

impl Platform {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "amazon_uk" => Self::AmazonUk,
            "amazon_us" => Self::AmazonUs,
            "spotify" => Self::Spotify,
            "itunes" => Self::Itunes,
            "steam" => Self::Steam,
            _ => Self::Other,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Self::AmazonUk => "amazon_uk",
            Self::AmazonUs => "amazon_us",
            Self::Spotify => "spotify",
            Self::Itunes => "itunes",
            Self::Steam => "steam",
            Self::Other => "other",
        }
    }
}

impl Serialize for Platform {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.tag())
    }
}

impl<'de> Deserialize<'de> for Platform {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = lenient_string(d)?;
        Ok(Self::from_tag(&raw))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Franchise {
    #[serde(default)]
    pub id: FranchiseId,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub popularity_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub slug: String,
}

impl Franchise {
    /// Popularity worth showing; zero and absent scores mean "no score".
    pub fn score(&self) -> Option<f64> {
        self.popularity_score.filter(|s| *s > 0.0)
    }

    pub fn created_year(&self) -> Option<i32> {
        self.created_at.as_deref().and_then(year_of)
    }

    pub fn slug_or_derived(&self) -> String {
        if self.slug.trim().is_empty() {
            slugify(&self.name)
        } else {
            self.slug.clone()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(default)]
    pub id: Id,
    #[serde(default)]
    pub franchise_id: Option<Id>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub order_type: String,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default)]
    pub id: Id,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub release_date: Option<String>,
    #[serde(default)]
    pub api_metadata: Option<Value>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_optional: bool,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub position: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub affiliate_links: Vec<AffiliateLink>,
}

impl Item {
    /// Rating out of ten from the external metadata (`vote_average`).
    pub fn rating(&self) -> Option<f64> {
        self.metadata_number("vote_average")
    }

    /// Runtime in minutes from the external metadata.
    pub fn runtime(&self) -> Option<f64> {
        self.metadata_number("runtime")
    }

    pub fn release_year(&self) -> Option<i32> {
        self.release_date.as_deref().and_then(year_of)
    }

    fn metadata_number(&self, key: &str) -> Option<f64> {
        self.api_metadata
            .as_ref()
            .and_then(|m| m.get(key))
            .and_then(Value::as_f64)
            .filter(|v| *v != 0.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AffiliateLink {
    #[serde(default)]
    pub id: Id,
    #[serde(default)]
    pub item_id: Option<Id>,
    #[serde(default)]
    pub platform: Platform,
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub currency: Option<String>,
}

/// Extract the year from the timestamp formats the backend emits.
pub fn year_of(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.year());
    }
    // e.g. 2024-09-26T15:14:34.277795
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.year());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(dt.year());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|d| d.year())
}

static NON_SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("slug pattern is a valid regex"));
static SLUG_GAPS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-\s]+").expect("slug gap pattern is a valid regex"));

/// URL-safe name: lowercase, punctuation dropped, whitespace runs become `-`.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let cleaned = NON_SLUG.replace_all(&lowered, "");
    SLUG_GAPS
        .replace_all(&cleaned, "-")
        .trim_matches('-')
        .to_string()
}

// ── Lenient field decoders ──

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    })
}

fn lenient_opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let s = lenient_string(d)?;
    Ok(if s.is_empty() { None } else { Some(s) })
}

fn lenient_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_i64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_bool<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::Bool(b)) => b,
        Some(Value::Number(n)) => n.as_i64().is_some_and(|i| i != 0),
        _ => false,
    })
}

pub(crate) fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_franchise_accepts_numeric_id_and_unknown_category() {
        let f: Franchise = serde_json::from_value(json!({
            "id": 42,
            "name": "Gran Turismo",
            "category": "simulators",
            "popularity_score": "7.5",
            "slug": "gran-turismo"
        }))
        .unwrap();
        assert_eq!(f.id.as_str(), "42");
        assert_eq!(f.category, Category::Other("simulators".to_string()));
        assert_eq!(f.category.icon(), "📁");
        assert_eq!(f.score(), Some(7.5));
    }

    #[test]
    fn test_franchise_missing_fields_use_defaults() {
        let f: Franchise = serde_json::from_value(json!({
            "id": "abc",
            "name": "Dune",
            "category": "books",
            "description": "",
            "image_url": null,
            "popularity_score": 0
        }))
        .unwrap();
        assert_eq!(f.category, Category::Books);
        assert_eq!(f.description, None);
        assert_eq!(f.image_url, None);
        assert_eq!(f.score(), None);
        assert_eq!(f.created_year(), None);
    }

    #[test]
    fn test_item_metadata_accessors() {
        let item: Item = serde_json::from_value(json!({
            "id": "i1",
            "title": "A New Hope",
            "api_metadata": { "vote_average": 8.2, "runtime": 121, "genres": ["sci-fi"] },
            "position": 4,
            "is_optional": null,
            "affiliate_links": null
        }))
        .unwrap();
        assert_eq!(item.rating(), Some(8.2));
        assert_eq!(item.runtime(), Some(121.0));
        assert_eq!(item.position, Some(4));
        assert!(!item.is_optional);
        assert!(item.affiliate_links.is_empty());
    }

    #[test]
    fn test_item_metadata_zero_or_garbage_is_absent() {
        let item: Item = serde_json::from_value(json!({
            "title": "Untitled",
            "api_metadata": { "vote_average": 0, "runtime": "long" }
        }))
        .unwrap();
        assert_eq!(item.rating(), None);
        assert_eq!(item.runtime(), None);
        assert_eq!(item.release_year(), None);
    }

    #[test]
    fn test_unknown_platform_falls_back_to_other() {
        let link: AffiliateLink = serde_json::from_value(json!({
            "platform": "bandcamp",
            "url": "https://example.com/x",
            "price": 12
        }))
        .unwrap();
        assert_eq!(link.platform, Platform::Other);
        assert_eq!(link.price, Some(12.0));

        let missing: AffiliateLink =
            serde_json::from_value(json!({ "url": "https://example.com/y" })).unwrap();
        assert_eq!(missing.platform, Platform::Other);
    }

    #[test]
    fn test_year_of_formats() {
        assert_eq!(year_of("2023-05-01T10:00:00Z"), Some(2023));
        assert_eq!(year_of("2024-09-26T15:14:34.277795"), Some(2024));
        assert_eq!(year_of("1977-05-25"), Some(1977));
        assert_eq!(year_of("2026-02-14 18:37:03"), Some(2026));
        assert_eq!(year_of("soon"), None);
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Fast & Furious"), "fast-furious");
        assert_eq!(slugify("  The Witcher: Blood Origin "), "the-witcher-blood-origin");
        assert_eq!(slugify("Marvel Cinematic Universe"), "marvel-cinematic-universe");
    }

    #[test]
    fn test_slug_or_derived_prefers_backend_slug() {
        let mut f = Franchise {
            name: "Star Wars".to_string(),
            slug: "sw".to_string(),
            ..Default::default()
        };
        assert_eq!(f.slug_or_derived(), "sw");
        f.slug.clear();
        assert_eq!(f.slug_or_derived(), "star-wars");
    }
}
