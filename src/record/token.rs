//! Tokens, sentences and entity types.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Entity type attached to a [Token] by a tagger.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityType {
    Per,
    Org,
    Loc,
    Fac,
    Gpe,
    Time,
    Date,
    Money,
    Percent,
    Misc,
    Title,
    Veh,
    Wea,
    /// The actual name is stored in [Token::custom_entity_type].
    CustomType,
}

impl EntityType {
    pub const ALL: [EntityType; 14] = [
        EntityType::Per,
        EntityType::Org,
        EntityType::Loc,
        EntityType::Fac,
        EntityType::Gpe,
        EntityType::Time,
        EntityType::Date,
        EntityType::Money,
        EntityType::Percent,
        EntityType::Misc,
        EntityType::Title,
        EntityType::Veh,
        EntityType::Wea,
        EntityType::CustomType,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Per => "PER",
            EntityType::Org => "ORG",
            EntityType::Loc => "LOC",
            EntityType::Fac => "FAC",
            EntityType::Gpe => "GPE",
            EntityType::Time => "TIME",
            EntityType::Date => "DATE",
            EntityType::Money => "MONEY",
            EntityType::Percent => "PERCENT",
            EntityType::Misc => "MISC",
            EntityType::Title => "TITLE",
            EntityType::Veh => "VEH",
            EntityType::Wea => "WEA",
            EntityType::CustomType => "CUSTOM_TYPE",
        }
    }
}

impl FromStr for EntityType {
    type Err = String;

    /// Parse the name returned by [EntityType::as_str], ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityType::ALL
            .iter()
            .find(|et| et.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| format!("unknown entity type {s:?}"))
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimal span unit produced by a tagger.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct Token {
    /// position of the token in its sentence.
    pub token_num: i32,
    pub token: String,
    pub entity_type: Option<EntityType>,
    /// links coreferent tokens of the same tagger run.
    pub equiv_id: Option<i32>,
    pub custom_entity_type: Option<String>,
}

impl Token {
    pub fn new(token_num: i32, token: &str) -> Self {
        Self {
            token_num,
            token: token.to_string(),
            ..Default::default()
        }
    }

    pub fn with_entity_type(mut self, entity_type: EntityType) -> Self {
        self.entity_type = Some(entity_type);
        self
    }

    pub fn with_equiv_id(mut self, equiv_id: i32) -> Self {
        self.equiv_id = Some(equiv_id);
        self
    }

    /// Name of the entity type, resolving [EntityType::CustomType] to the custom name.
    pub fn entity_type_name(&self) -> Option<&str> {
        match self.entity_type {
            Some(EntityType::CustomType) => self
                .custom_entity_type
                .as_deref()
                .or(Some(EntityType::CustomType.as_str())),
            Some(et) => Some(et.as_str()),
            None => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct Sentence {
    pub tokens: Vec<Token>,
}

impl Sentence {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    /// Space-joined surface text of the sentence.
    pub fn text(&self) -> String {
        self.tokens
            .iter()
            .map(|t| t.token.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
