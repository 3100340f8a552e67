use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use regex::Regex;

/// Rendered when no vertical matched.
pub const NO_MATCH: &str = "N/A";

#[derive(Debug, Clone)]
struct Vertical {
    name: String,
    words: Vec<Regex>,
}

/// Vertical name → trigger words, in file order.
#[derive(Debug, Clone, Default)]
pub struct Taxonomy {
    verticals: Vec<Vertical>,
}

impl Taxonomy {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read keywords file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Invalid keywords file {}", path.display()))
    }

    /// Parse `{"vertical": ["word", ...], ...}` keeping key order.
    pub fn from_json(text: &str) -> Result<Self> {
        let raw: serde_json::Map<String, serde_json::Value> = serde_json::from_str(text)?;
        let mut pairs = Vec::with_capacity(raw.len());
        for (name, words) in raw {
            let words: Vec<String> = serde_json::from_value(words)
                .with_context(|| format!("Vertical {:?} must map to a list of strings", name))?;
            pairs.push((name, words));
        }
        Self::from_pairs(pairs)
    }

    pub fn from_pairs<I, W>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, W)>,
        W: IntoIterator,
        W::Item: AsRef<str>,
    {
        let mut verticals = Vec::new();
        for (name, words) in pairs {
            let mut compiled = Vec::new();
            for word in words {
                let word = word.as_ref().to_lowercase();
                if word.is_empty() {
                    continue;
                }
                compiled.push(Regex::new(&format!(r"\b{}\b", regex::escape(&word)))?);
            }
            verticals.push(Vertical {
                name,
                words: compiled,
            });
        }
        Ok(Self { verticals })
    }

    pub fn len(&self) -> usize {
        self.verticals.len()
    }
}

/// Verticals assigned to one job, in taxonomy order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verticals {
    Matched(Vec<String>),
    NoMatch,
}

impl fmt::Display for Verticals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verticals::Matched(names) => f.write_str(&names.join(", ")),
            Verticals::NoMatch => f.write_str(NO_MATCH),
        }
    }
}

/// Whole-word, case-insensitive match of each vertical's trigger words
/// against `title + " " + description`. A vertical is reported once, on its
/// first matching word.
pub fn match_verticals(title: &str, description: &str, taxonomy: &Taxonomy) -> Verticals {
    let blob = format!("{} {}", title, description).to_lowercase();
    let matched: Vec<String> = taxonomy
        .verticals
        .iter()
        .filter(|v| v.words.iter().any(|re| re.is_match(&blob)))
        .map(|v| v.name.clone())
        .collect();

    if matched.is_empty() {
        Verticals::NoMatch
    } else {
        Verticals::Matched(matched)
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn taxonomy(json: &str) -> Taxonomy {
        Taxonomy::from_json(json).unwrap()
    }

    #[test]
    fn word_boundaries_are_respected() {
        let t = taxonomy(r#"{"tech": ["ai"]}"#);
        assert_eq!(
            match_verticals("Facilities officer", "You will maintain the office", &t),
            Verticals::NoMatch
        );
        assert_eq!(
            match_verticals("AI lead", "", &t),
            Verticals::Matched(vec!["tech".into()])
        );
    }

    #[test]
    fn no_match_renders_sentinel() {
        let t = taxonomy(r#"{"finance": ["budget"]}"#);
        let v = match_verticals("Driver", "Drive the van", &t);
        assert_eq!(v, Verticals::NoMatch);
        assert_eq!(v.to_string(), NO_MATCH);
    }

    #[test]
    fn order_follows_taxonomy_not_alphabet() {
        let t = taxonomy(
            r#"{"zero carbon": ["emissions"], "adaptation": ["flood"], "finance": ["investment"]}"#,
        );
        let v = match_verticals(
            "Programme Manager",
            "Investment in flood defences to cut emissions",
            &t,
        );
        assert_eq!(v.to_string(), "zero carbon, adaptation, finance");
    }

    #[test]
    fn case_insensitive_and_title_counts() {
        let t = taxonomy(r#"{"climate": ["Net Zero"]}"#);
        let v = match_verticals("NET ZERO Advisor", "Support cities", &t);
        assert_eq!(v, Verticals::Matched(vec!["climate".into()]));
    }

    #[test]
    fn title_and_description_are_space_joined() {
        let t = taxonomy(r#"{"air": ["air quality"]}"#);
        let v = match_verticals("Clean Air", "Quality monitoring", &t);
        assert_eq!(v.to_string(), "air");
    }

    #[test]
    fn special_characters_are_escaped() {
        let t = taxonomy(r#"{"data": ["c.a.d", "r&d"]}"#);
        assert_eq!(match_verticals("CXAXD", "", &t), Verticals::NoMatch);
        assert!(matches!(match_verticals("R&D officer", "", &t), Verticals::Matched(_)));
    }

    #[test]
    fn empty_words_are_ignored() {
        let t = taxonomy(r#"{"blank": [""]}"#);
        assert_eq!(t.len(), 1);
        assert_eq!(match_verticals("anything", "at all", &t), Verticals::NoMatch);
    }

    #[test]
    fn words_are_not_trimmed() {
        let t = taxonomy(r#"{"grid": [" grid"]}"#);
        assert_eq!(match_verticals("Grid engineer", "", &t), Verticals::NoMatch);
        assert!(matches!(match_verticals("Smart grid lead", "", &t), Verticals::Matched(_)));
    }

    #[test]
    fn rejects_non_list_values() {
        assert!(Taxonomy::from_json(r#"{"climate": "emissions"}"#).is_err());
        assert!(Taxonomy::from_json(r#"["climate"]"#).is_err());
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keywords.json");
        std::fs::write(&path, r#"{"health": ["clinic"]}"#).unwrap();
        let t = Taxonomy::load(&path).unwrap();
        assert_eq!(t.len(), 1);
        assert!(Taxonomy::load(&dir.path().join("missing.json")).is_err());
    }
}
