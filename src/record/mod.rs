/*! Record types

A chunk file holds [StreamItem]s. Each item carries its text body and a mapping from tagger name
to the [Sentence]s that tagger produced.

These are plain data: the chunk layer only needs to know about them at the granularity of a named
annotation layer.
!*/
mod item;
mod token;

pub use item::{ContentItem, StreamItem, Tagging, Version};
pub use token::{EntityType, Sentence, Token};
