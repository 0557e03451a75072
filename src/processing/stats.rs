//! Entity type statistics over chunk files.
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;

use log::{debug, info};

use crate::error::Error;
use crate::record::{EntityType, Sentence, StreamItem};
use crate::scan::{CorpusScanner, ScanReport};

/// Token counts per tagger, then per entity type.
pub type EntityCounts = BTreeMap<String, BTreeMap<EntityType, u64>>;

#[derive(Debug, Clone, PartialEq)]
pub struct EntityStats {
    pub report: ScanReport,
    pub per_tagger: EntityCounts,
}

/// Count the tokens of each entity type in `entity_types`, per tagger, over every record of `paths`.
///
/// An empty `entity_types` counts every type. Types with no token are not listed.
/// Corrupt chunks are handled according to the scanner's policy.
pub fn stats(
    scanner: &CorpusScanner,
    paths: &[PathBuf],
    entity_types: &[EntityType],
) -> Result<EntityStats, Error> {
    let wanted: &[EntityType] = if entity_types.is_empty() {
        &EntityType::ALL
    } else {
        entity_types
    };
    let counts = Mutex::new(EntityCounts::new());

    let report = scanner.scan_with(paths, |path, item| {
        let item_counts = count_item(item, wanted);
        debug!("{:?} [{}]: {:?}", path, item.stream_id(), item_counts);

        let mut counts = counts.lock().unwrap_or_else(|e| e.into_inner());
        for (tagger, per_type) in item_counts {
            let total = counts.entry(tagger).or_default();
            for (entity_type, nb) in per_type {
                *total.entry(entity_type).or_default() += nb;
            }
        }
    })?;

    let per_tagger = counts.into_inner().unwrap_or_else(|e| e.into_inner());
    info!(
        "counted entity types of {} records over {} taggers",
        report.records,
        per_tagger.len()
    );
    Ok(EntityStats { report, per_tagger })
}

fn count_item(item: &StreamItem, wanted: &[EntityType]) -> EntityCounts {
    item.body
        .sentences
        .iter()
        .map(|(tagger, sentences)| (tagger.clone(), count_sentences(sentences, wanted)))
        .collect()
}

fn count_sentences(sentences: &[Sentence], wanted: &[EntityType]) -> BTreeMap<EntityType, u64> {
    let mut counts = BTreeMap::new();
    for entity_type in sentences
        .iter()
        .flat_map(|s| s.tokens.iter())
        .filter_map(|t| t.entity_type)
        .filter(|et| wanted.contains(et))
    {
        *counts.entry(entity_type).or_default() += 1;
    }
    counts
}
