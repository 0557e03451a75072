/*! Annotation layers

[AnnotationMerge] inserts the output of a named tagger into a [crate::record::StreamItem],
leaving the body and every other layer untouched.
[Annotate] implementors produce such layers and can be chained with an [Annotator].
!*/
mod annotator;
mod merge;

pub use annotator::{Annotate, Annotator, WordTagger};
pub use merge::{AnnotationMerge, MergePolicy, TokenSpec, Validation};
