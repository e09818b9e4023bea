//! Way retention and tag capture rules.

use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::{MapError, MapResult};

/// Road classes retained by the default filter.
const ROAD_CLASSES: [&str; 18] = [
    "motorway",
    "motorway_link",
    "trunk",
    "trunk_link",
    "primary",
    "primary_link",
    "secondary",
    "secondary_link",
    "tertiary",
    "tertiary_link",
    "residential",
    "living_street",
    "unclassified",
    "service",
    "ferry",
    "movable",
    "shuttle_train",
    "default",
];

/// A single tag-match rule: key only, or key with a required value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagRule {
    pub key: String,
    pub value: Option<String>,
}

impl TagRule {
    fn matches(&self, key: &str, value: &str) -> bool {
        self.key == key && self.value.as_deref().is_none_or(|v| v == value)
    }
}

/// Decides which ways are kept and which of their tags are stored.
///
/// The two variants differ in capture behavior on purpose: `Roads` stores
/// *every* tag of a retained way, while `Rules` stores only the tags that
/// matched a rule.
#[derive(Clone, Debug, Default)]
pub enum WayFilter {
    /// Keep ways whose `highway` tag names a known road class.
    #[default]
    Roads,
    /// Keep ways with at least one tag satisfying at least one rule.
    Rules(Vec<TagRule>),
}

impl WayFilter {
    /// Should a way with these tags be retained?
    pub fn retains(&self, tags: &[(String, String)]) -> bool {
        match self {
            WayFilter::Roads => tags
                .iter()
                .any(|(k, v)| k == "highway" && ROAD_CLASSES.contains(&v.as_str())),
            WayFilter::Rules(rules) => tags
                .iter()
                .any(|(k, v)| rules.iter().any(|r| r.matches(k, v))),
        }
    }

    /// Should this tag of a retained way be stored?
    pub fn captures(&self, key: &str, value: &str) -> bool {
        match self {
            WayFilter::Roads => true,
            WayFilter::Rules(rules) => rules.iter().any(|r| r.matches(key, value)),
        }
    }

    /// Load rules from a file: one rule per line, `key` or `key=value`.
    /// Blank lines and `#` comments are skipped.
    ///
    /// # Errors
    ///
    /// [`MapError::FilterRule`] for a line with an empty key or an empty
    /// value after `=`; [`MapError::Io`] on read failure.
    pub fn from_rules_file(path: &Path) -> MapResult<WayFilter> {
        let reader = BufReader::new(std::fs::File::open(path)?);
        let mut rules = Vec::new();

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let text = line.trim();
            if text.is_empty() || text.starts_with('#') {
                continue;
            }
            let malformed = || MapError::FilterRule {
                path: path.to_path_buf(),
                line: i + 1,
                text: line.clone(),
            };
            let rule = match text.split_once('=') {
                None => TagRule { key: text.to_owned(), value: None },
                Some((key, value)) => {
                    if key.is_empty() || value.is_empty() {
                        return Err(malformed());
                    }
                    TagRule {
                        key: key.to_owned(),
                        value: Some(value.to_owned()),
                    }
                }
            };
            rules.push(rule);
        }

        Ok(WayFilter::Rules(rules))
    }
}
