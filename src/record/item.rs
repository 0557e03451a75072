use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::Sentence;

/// Record schema version. Only the current one is accepted on read.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum Version {
    #[default]
    V0_3_0,
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Version::V0_3_0 => f.write_str("v0_3_0"),
        }
    }
}

/// Metadata about a tagger run, stored next to its layer.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct Tagging {
    /// must match the key of the layer in [ContentItem::sentences].
    pub tagger_id: String,
    pub tagger_config: Option<String>,
    pub tagger_version: Option<String>,
    /// serialized tagging data in some tagger-native format.
    pub raw_tagging: Vec<u8>,
}

impl Tagging {
    pub fn new(tagger_id: &str) -> Self {
        Self {
            tagger_id: tagger_id.to_string(),
            ..Default::default()
        }
    }
}

/// Text body and annotation layers of a [StreamItem].
///
/// Maps are ordered so that encoding a record does not depend on insertion order.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct ContentItem {
    pub raw: Vec<u8>,
    pub clean_visible: Option<String>,
    pub taggings: BTreeMap<String, Tagging>,
    pub sentences: BTreeMap<String, Vec<Sentence>>,
}

/// One document of a chunk file.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct StreamItem {
    pub version: Version,
    pub stream_id: String,
    pub body: ContentItem,
}

impl StreamItem {
    /// Create a new item whose raw body and clean text are both `text`.
    pub fn new(stream_id: &str, text: &str) -> Self {
        Self {
            version: Version::default(),
            stream_id: stream_id.to_string(),
            body: ContentItem {
                raw: text.as_bytes().to_vec(),
                clean_visible: Some(text.to_string()),
                ..Default::default()
            },
        }
    }

    pub fn stream_id(&self) -> &str {
        &self.stream_id
    }

    /// Text to tokenize: clean text if present, lossy raw body otherwise.
    pub fn text(&self) -> String {
        match &self.body.clean_visible {
            Some(t) => t.clone(),
            None => String::from_utf8_lossy(&self.body.raw).into_owned(),
        }
    }

    /// Sentences produced by `tagger`, if any.
    pub fn layer(&self, tagger: &str) -> Option<&[Sentence]> {
        self.body.sentences.get(tagger).map(Vec::as_slice)
    }

    pub fn taggers(&self) -> impl Iterator<Item = &str> {
        self.body.sentences.keys().map(String::as_str)
    }
}
