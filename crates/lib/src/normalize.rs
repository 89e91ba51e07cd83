//! Ingredient name canonicalization.
//!
//! Detected ingredient names arrive in whatever shape the vision model
//! produced them ("2 cups Fresh Chopped Tomatoes"). The normalizer reduces
//! each to a canonical lowercase singular form with quantities, units and
//! descriptive adjectives stripped, resolves synonyms against a map loaded
//! once at startup, and deduplicates detections by keeping the highest
//! confidence per canonical name.
//!
//! The singularizer is a deliberate heuristic, not a morphological
//! analyzer; its false positives ("olives" -> "oliv") are accepted.

use crate::types::{clamp_confidence, DetectedIngredient};
use regex::Regex;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{info, warn};

/// Descriptive adjectives that never distinguish one ingredient from
/// another.
const STOPWORDS: &[&str] = &[
    "fresh", "organic", "chopped", "diced", "sliced", "minced", "raw", "cooked", "ripe", "large",
    "small", "boneless", "skinless",
];

// Standalone numbers, the common literal fractions, and unit words.
static UNITS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d+(\.\d+)?|1/2|1/4)\b|\b(g|kg|ml|l|tbsp|tsp|cup|cups)\b")
        .expect("units regex is valid")
});

static NON_ALNUM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\s-]").expect("charset regex is valid"));

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex is valid"));

/// A static canonical-name to canonical-name mapping, loaded once at
/// process start and immutable thereafter.
#[derive(Debug, Clone, Default)]
pub struct SynonymMap {
    entries: HashMap<String, String>,
}

impl SynonymMap {
    /// Loads the map from a JSON file of `{"alias": "canonical"}` pairs.
    ///
    /// A missing or unreadable file yields an empty map: canonicalization
    /// then falls back to the built-in rules alone.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => {
                info!(path = %path.display(), "No synonym file found, using built-in rules only");
                return Self::default();
            }
        };
        match serde_json::from_str::<HashMap<String, String>>(&content) {
            Ok(entries) => {
                info!(path = %path.display(), count = entries.len(), "Loaded ingredient synonyms");
                Self { entries }
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring malformed synonym file");
                Self::default()
            }
        }
    }

    /// Builds a map directly from `(alias, canonical)` pairs.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.entries.get(name).map(String::as_str).unwrap_or(name)
    }
}

/// Canonicalizes and deduplicates detected ingredient names.
#[derive(Debug, Clone, Default)]
pub struct IngredientNormalizer {
    synonyms: SynonymMap,
}

impl IngredientNormalizer {
    pub fn new(synonyms: SynonymMap) -> Self {
        Self { synonyms }
    }

    /// Reduces a raw name to its canonical form.
    ///
    /// An empty result means the name carried no ingredient content at all
    /// (only quantities, units and stopwords) and should be discarded.
    /// The function is idempotent: normalizing an already-canonical name
    /// returns it unchanged.
    pub fn normalize_name(&self, raw: &str) -> String {
        let mut s = raw.trim().to_lowercase();
        s = NON_ALNUM_RE.replace_all(&s, " ").into_owned();
        s = WHITESPACE_RE.replace_all(s.trim(), " ").into_owned();

        s = UNITS_RE.replace_all(&s, " ").into_owned();
        s = WHITESPACE_RE.replace_all(s.trim(), " ").into_owned();

        let s = s
            .split(' ')
            .filter(|token| !token.is_empty() && !STOPWORDS.contains(token))
            .collect::<Vec<_>>()
            .join(" ");
        if s.is_empty() {
            return s;
        }

        let s = singularize(&s);
        self.synonyms.resolve(&s).to_string()
    }

    /// Normalizes every detection, discards the empty ones, and keeps one
    /// entry per canonical name carrying the maximum confidence seen.
    ///
    /// Output is sorted by confidence descending; ties keep first-seen
    /// order.
    pub fn normalize_and_dedupe(&self, items: &[DetectedIngredient]) -> Vec<DetectedIngredient> {
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut best: Vec<DetectedIngredient> = Vec::new();

        for item in items {
            let name = self.normalize_name(&item.name);
            if name.is_empty() {
                continue;
            }
            let confidence = clamp_confidence(item.confidence);
            match index.get(&name) {
                Some(&i) => {
                    if confidence > best[i].confidence {
                        best[i].confidence = confidence;
                    }
                }
                None => {
                    index.insert(name.clone(), best.len());
                    best.push(DetectedIngredient { name, confidence });
                }
            }
        }

        best.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
        });
        best
    }

    /// Coerces one raw model-payload element into a detection.
    ///
    /// Only objects with a non-empty string `name` survive; confidence
    /// accepts numbers or numeric strings and is clamped into `[0, 1]`,
    /// defaulting to `0.0` otherwise.
    pub fn coerce_detection(value: &Value) -> Option<DetectedIngredient> {
        let obj = value.as_object()?;
        let name = obj.get("name")?.as_str()?.trim().to_string();
        if name.is_empty() {
            return None;
        }
        let confidence = match obj.get("confidence") {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
            _ => 0.0,
        };
        Some(DetectedIngredient {
            name,
            confidence: clamp_confidence(confidence),
        })
    }
}

/// Naive English singularization: `berries` -> `berry`, `tomatoes` ->
/// `tomato`, `eggs` -> `egg`. Short words are left alone, and the `ses`/
/// `ss` guards keep the function idempotent (`houses` -> `house`, `glass`
/// unchanged) instead of eating one letter per application.
fn singularize(s: &str) -> String {
    if s.ends_with("ies") && s.len() > 4 {
        format!("{}y", &s[..s.len() - 3])
    } else if s.ends_with("es") && !s.ends_with("ses") && s.len() > 3 {
        s[..s.len() - 2].to_string()
    } else if s.ends_with('s') && !s.ends_with("ss") && s.len() > 3 {
        s[..s.len() - 1].to_string()
    } else {
        s.to_string()
    }
}
