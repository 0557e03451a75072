//! Insertion of a named annotation layer.
use log::debug;

use crate::error::{Error, ShapeViolation};
use crate::record::{EntityType, Sentence, StreamItem, Tagging, Token};

/// Caller-supplied description of a [Token].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSpec {
    pub index: i32,
    pub text: String,
    pub entity_type: Option<EntityType>,
    pub equiv_id: Option<i32>,
}

impl TokenSpec {
    pub fn new(index: i32, text: &str) -> Self {
        Self {
            index,
            text: text.to_string(),
            entity_type: None,
            equiv_id: None,
        }
    }
}

impl From<(i32, &str)> for TokenSpec {
    fn from((index, text): (i32, &str)) -> Self {
        TokenSpec::new(index, text)
    }
}

impl From<(i32, &str, Option<EntityType>, Option<i32>)> for TokenSpec {
    fn from(
        (index, text, entity_type, equiv_id): (i32, &str, Option<EntityType>, Option<i32>),
    ) -> Self {
        Self {
            index,
            text: text.to_string(),
            entity_type,
            equiv_id,
        }
    }
}

impl From<TokenSpec> for Token {
    fn from(spec: TokenSpec) -> Token {
        Token {
            token_num: spec.index,
            token: spec.text,
            entity_type: spec.entity_type,
            equiv_id: spec.equiv_id,
            custom_entity_type: None,
        }
    }
}

/// What to do when the tagger already has a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePolicy {
    /// replace the whole layer (last write wins).
    #[default]
    Overwrite,
    /// fail with [ShapeViolation::TaggerCollision].
    Reject,
}

/// Whether token indices are checked before insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Validation {
    /// indices must be unique and increasing within each sentence.
    #[default]
    Strict,
    /// caller guarantees the indices.
    Trust,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AnnotationMerge {
    policy: MergePolicy,
    validation: Validation,
}

impl AnnotationMerge {
    pub fn new(policy: MergePolicy, validation: Validation) -> Self {
        Self { policy, validation }
    }

    pub fn policy(&self) -> MergePolicy {
        self.policy
    }

    /// Build sentences from token descriptions, checking indices if required.
    pub fn build_sentences<S, T>(&self, sentences: S) -> Result<Vec<Sentence>, Error>
    where
        S: IntoIterator,
        S::Item: IntoIterator<Item = T>,
        T: Into<TokenSpec>,
    {
        sentences
            .into_iter()
            .enumerate()
            .map(|(sentence_idx, specs)| {
                let tokens: Vec<Token> = specs
                    .into_iter()
                    .map(|spec| {
                        let spec: TokenSpec = spec.into();
                        Token::from(spec)
                    })
                    .collect();
                if self.validation == Validation::Strict {
                    check_indices(sentence_idx, &tokens)?;
                }
                Ok(Sentence::new(tokens))
            })
            .collect()
    }

    /// Returns `item` with the layer of `tagger` set to `sentences`.
    pub fn apply<S, T>(
        &self,
        mut item: StreamItem,
        tagger: &str,
        sentences: S,
    ) -> Result<StreamItem, Error>
    where
        S: IntoIterator,
        S::Item: IntoIterator<Item = T>,
        T: Into<TokenSpec>,
    {
        self.apply_in_place(&mut item, tagger, sentences)?;
        Ok(item)
    }

    /// Set the layer of `tagger` to `sentences`.
    ///
    /// On error `item` is left unchanged.
    pub fn apply_in_place<S, T>(
        &self,
        item: &mut StreamItem,
        tagger: &str,
        sentences: S,
    ) -> Result<(), Error>
    where
        S: IntoIterator,
        S::Item: IntoIterator<Item = T>,
        T: Into<TokenSpec>,
    {
        let sentences = self.build_sentences(sentences)?;
        self.insert_layer(item, tagger, sentences)
    }

    /// Same as [Self::apply_in_place], also storing the tagger metadata.
    /// The layer is named after [Tagging::tagger_id].
    pub fn apply_with_tagging<S, T>(
        &self,
        item: &mut StreamItem,
        tagging: Tagging,
        sentences: S,
    ) -> Result<(), Error>
    where
        S: IntoIterator,
        S::Item: IntoIterator<Item = T>,
        T: Into<TokenSpec>,
    {
        let sentences = self.build_sentences(sentences)?;
        let tagger = tagging.tagger_id.clone();
        self.insert_layer(item, &tagger, sentences)?;
        item.body.taggings.insert(tagger, tagging);
        Ok(())
    }

    /// Insert already built sentences.
    pub fn insert_layer(
        &self,
        item: &mut StreamItem,
        tagger: &str,
        sentences: Vec<Sentence>,
    ) -> Result<(), Error> {
        if tagger.is_empty() {
            return Err(ShapeViolation::EmptyTaggerName.into());
        }
        if self.policy == MergePolicy::Reject && item.body.sentences.contains_key(tagger) {
            return Err(ShapeViolation::TaggerCollision(tagger.to_string()).into());
        }

        debug!(
            "{}: setting layer {} ({} sentences)",
            item.stream_id,
            tagger,
            sentences.len()
        );
        item.body.sentences.insert(tagger.to_string(), sentences);
        Ok(())
    }
}

fn check_indices(sentence: usize, tokens: &[Token]) -> Result<(), ShapeViolation> {
    for pair in tokens.windows(2) {
        if pair[1].token_num <= pair[0].token_num {
            return Err(ShapeViolation::NonIncreasingIndex {
                sentence,
                previous: pair[0].token_num,
                index: pair[1].token_num,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cat_sentence() -> Vec<TokenSpec> {
        vec![
            (0, "The", Some(EntityType::Fac), Some(2)).into(),
            (1, "cat").into(),
            (2, "jumped").into(),
            (3, "high").into(),
        ]
    }

    fn item_with_layer() -> StreamItem {
        let mut item = StreamItem::new("b", "b");
        item.body.sentences.insert(
            "other".to_string(),
            vec![Sentence::new(vec![Token::new(0, "b")])],
        );
        item
    }

    #[test]
    fn inserts_layer() {
        let item = AnnotationMerge::default()
            .apply(item_with_layer(), "my_tagger", vec![cat_sentence()])
            .unwrap();

        let layer = item.layer("my_tagger").unwrap();
        assert_eq!(layer.len(), 1);
        let texts: Vec<&str> = layer[0].tokens.iter().map(|t| t.token.as_str()).collect();
        assert_eq!(texts, vec!["The", "cat", "jumped", "high"]);
        assert_eq!(layer[0].tokens[0].entity_type, Some(EntityType::Fac));
        assert_eq!(layer[0].tokens[0].equiv_id, Some(2));
    }

    #[test]
    fn overwrite_replaces_layer() {
        let merge = AnnotationMerge::default();
        let before = item_with_layer();
        let item = merge
            .apply(before.clone(), "my_tagger", vec![cat_sentence()])
            .unwrap();
        let item = merge
            .apply(item, "my_tagger", vec![vec![(0, "dog")]])
            .unwrap();

        let layer = item.layer("my_tagger").unwrap();
        assert_eq!(layer.len(), 1);
        assert_eq!(layer[0].tokens.len(), 1);
        assert_eq!(layer[0].tokens[0].token, "dog");

        // untouched
        assert_eq!(item.layer("other"), before.layer("other"));
        assert_eq!(item.body.raw, before.body.raw);
        assert_eq!(item.body.clean_visible, before.body.clean_visible);
    }

    #[test]
    fn reject_collision() {
        let merge = AnnotationMerge::new(MergePolicy::Reject, Validation::Strict);
        let mut item = item_with_layer();
        let err = merge
            .apply_in_place(&mut item, "other", vec![cat_sentence()])
            .unwrap_err();
        assert!(matches!(
            err,
            Error::ShapeViolation(ShapeViolation::TaggerCollision(_))
        ));
        assert_eq!(item, item_with_layer());
    }

    #[test]
    fn non_increasing_indices() {
        let merge = AnnotationMerge::default();
        let mut item = item_with_layer();
        let res = merge.apply_in_place(
            &mut item,
            "my_tagger",
            vec![vec![(0, "a"), (1, "b")], vec![(0, "c"), (0, "d")]],
        );
        match res {
            Err(Error::ShapeViolation(ShapeViolation::NonIncreasingIndex {
                sentence,
                previous,
                index,
            })) => assert_eq!((sentence, previous, index), (1, 0, 0)),
            other => panic!("unexpected {:?}", other),
        }
        assert!(item.layer("my_tagger").is_none());
    }

    #[test]
    fn trust_skips_checks() {
        let merge = AnnotationMerge::new(MergePolicy::Overwrite, Validation::Trust);
        let item = merge
            .apply(item_with_layer(), "t", vec![vec![(3, "a"), (1, "b")]])
            .unwrap();
        assert_eq!(item.layer("t").unwrap()[0].tokens[0].token_num, 3);
    }

    #[test]
    fn empty_tagger_name() {
        let err = AnnotationMerge::default()
            .apply(item_with_layer(), "", vec![cat_sentence()])
            .unwrap_err();
        assert!(matches!(
            err,
            Error::ShapeViolation(ShapeViolation::EmptyTaggerName)
        ));
    }

    #[test]
    fn with_tagging() {
        let mut tagging = Tagging::new("my_tagger");
        tagging.tagger_version = Some("6.0.1".to_string());

        let mut item = item_with_layer();
        AnnotationMerge::default()
            .apply_with_tagging(&mut item, tagging.clone(), vec![cat_sentence()])
            .unwrap();
        assert_eq!(item.body.taggings.get("my_tagger"), Some(&tagging));
        assert!(item.layer("my_tagger").is_some());
    }
}
