//! Annotate trait
use unicode_segmentation::UnicodeSegmentation;

use crate::error::Error;
use crate::record::StreamItem;

use super::{AnnotationMerge, TokenSpec};

/// Annotations add a named layer to a record.
pub trait Annotate {
    fn annotate(&self, item: &mut StreamItem) -> Result<(), Error>;
}

/// Annotator enables annotation chaining, adding multiple annotators and
/// doing the annotation process in one step.
#[derive(Default)]
pub struct Annotator(Vec<Box<dyn Annotate + Sync>>);

impl Annotator {
    pub fn add(&mut self, annotator: Box<dyn Annotate + Sync>) -> &mut Annotator {
        self.0.push(annotator);
        self
    }
}

impl Annotate for Annotator {
    /// Stops at the first failing annotator. Layers added before the failure are kept.
    fn annotate(&self, item: &mut StreamItem) -> Result<(), Error> {
        for annotator in &self.0 {
            annotator.annotate(item)?;
        }
        Ok(())
    }
}

/// Baseline tagger: one sentence per non-empty line, one token per unicode word.
pub struct WordTagger {
    name: String,
    merge: AnnotationMerge,
}

impl WordTagger {
    pub fn new(name: &str, merge: AnnotationMerge) -> Self {
        Self {
            name: name.to_string(),
            merge,
        }
    }

    fn tokenize(text: &str) -> Vec<Vec<TokenSpec>> {
        text.lines()
            .map(|line| {
                line.unicode_words()
                    .enumerate()
                    .map(|(idx, word)| TokenSpec::new(idx as i32, word))
                    .collect::<Vec<_>>()
            })
            .filter(|sentence| !sentence.is_empty())
            .collect()
    }
}

impl Annotate for WordTagger {
    fn annotate(&self, item: &mut StreamItem) -> Result<(), Error> {
        let sentences = Self::tokenize(&item.text());
        self.merge.apply_in_place(item, &self.name, sentences)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::{MergePolicy, Validation};

    #[test]
    fn word_tagger() {
        let mut item = StreamItem::new("id", "The cat jumped high.\n\nIt landed.");
        WordTagger::new("words", AnnotationMerge::default())
            .annotate(&mut item)
            .unwrap();

        let layer = item.layer("words").unwrap();
        assert_eq!(layer.len(), 2);
        assert_eq!(layer[0].text(), "The cat jumped high");
        let indices: Vec<i32> = layer[0].tokens.iter().map(|t| t.token_num).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
        assert_eq!(layer[1].text(), "It landed");
    }

    #[test]
    fn chain() {
        let mut annotator = Annotator::default();
        annotator
            .add(Box::new(WordTagger::new("a", AnnotationMerge::default())))
            .add(Box::new(WordTagger::new("b", AnnotationMerge::default())));

        let mut item = StreamItem::new("id", "foo bar");
        annotator.annotate(&mut item).unwrap();
        assert_eq!(item.taggers().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn chain_stops_on_error() {
        let reject = AnnotationMerge::new(MergePolicy::Reject, Validation::Strict);
        let mut annotator = Annotator::default();
        annotator
            .add(Box::new(WordTagger::new("a", reject)))
            .add(Box::new(WordTagger::new("a", reject)))
            .add(Box::new(WordTagger::new("c", reject)));

        let mut item = StreamItem::new("id", "foo bar");
        assert!(annotator.annotate(&mut item).is_err());
        assert_eq!(item.taggers().collect::<Vec<_>>(), vec!["a"]);
    }
}
