use std::path::Path;

use streamchunk::annotate::{AnnotationMerge, TokenSpec};
use streamchunk::error::Error;
use streamchunk::io::{FileChunkReader, FileChunkWriter};
use streamchunk::record::{EntityType, Sentence, StreamItem, Token};

fn body_items() -> Vec<StreamItem> {
    ["a", "b", "c"]
        .iter()
        .map(|body| {
            let mut item = StreamItem::new(&format!("id-{body}"), body);
            item.body.sentences.insert(
                "lingpipe".to_string(),
                vec![Sentence::new(vec![
                    Token::new(0, body).with_entity_type(EntityType::Per)
                ])],
            );
            item
        })
        .collect()
}

fn write_chunk(path: &Path, items: &[StreamItem]) {
    let mut wr = FileChunkWriter::create(path).unwrap();
    wr.extend(items).unwrap();
    let summary = wr.finish().unwrap();
    assert_eq!(summary.count, items.len() as u64);
}

fn read_chunk(path: &Path) -> Vec<StreamItem> {
    FileChunkReader::from_path(path)
        .unwrap()
        .collect::<Result<Vec<_>, Error>>()
        .unwrap()
}

#[test_log::test]
fn augment_one_record() {
    let dst = tempfile::tempdir().unwrap();
    let source = dst.path().join("source.sc");
    let augmented = dst.path().join("augmented.sc");
    write_chunk(&source, &body_items());

    let merge = AnnotationMerge::default();
    let mut wr = FileChunkWriter::create(&augmented).unwrap();
    for item in FileChunkReader::from_path(&source).unwrap() {
        let mut item = item.unwrap();
        if item.text() == "b" {
            let tokens: Vec<TokenSpec> = ["The", "cat", "jumped", "high"]
                .iter()
                .enumerate()
                .map(|(idx, tok)| TokenSpec::new(idx as i32, tok))
                .collect();
            item = merge.apply(item, "my_tagger", vec![tokens]).unwrap();
        }
        wr.add(&item).unwrap();
    }
    wr.finish().unwrap();

    let before = body_items();
    let after = read_chunk(&augmented);
    assert_eq!(after.len(), 3);

    assert_eq!(after[0], before[0]);
    assert_eq!(after[2], before[2]);

    let layer = after[1].layer("my_tagger").unwrap();
    assert_eq!(layer.len(), 1);
    let tokens: Vec<(i32, &str)> = layer[0]
        .tokens
        .iter()
        .map(|t| (t.token_num, t.token.as_str()))
        .collect();
    assert_eq!(
        tokens,
        vec![(0, "The"), (1, "cat"), (2, "jumped"), (3, "high")]
    );
    // the other layer is bit-identical
    assert_eq!(after[1].layer("lingpipe"), before[1].layer("lingpipe"));
    assert_eq!(after[1].body.raw, before[1].body.raw);
}

#[test]
fn records_come_back_in_order() {
    let dst = tempfile::tempdir().unwrap();
    let path = dst.path().join("ordered.sc");
    let items: Vec<StreamItem> = (0..50)
        .map(|i| StreamItem::new(&i.to_string(), &"word ".repeat(i)))
        .collect();
    write_chunk(&path, &items);

    let mut reader = FileChunkReader::from_path(&path).unwrap();
    for expected in &items {
        assert_eq!(&reader.read_next().unwrap().unwrap(), expected);
    }
    assert!(reader.read_next().unwrap().is_none());
    assert!(reader.is_done());
    assert_eq!(reader.bytes_read(), std::fs::metadata(&path).unwrap().len());
}

#[test]
fn empty_file_is_empty_stream() {
    let dst = tempfile::tempdir().unwrap();
    let path = dst.path().join("empty.sc");
    FileChunkWriter::create(&path).unwrap().finish().unwrap();

    assert_eq!(std::fs::metadata(&path).unwrap().len(), 0);
    assert!(read_chunk(&path).is_empty());
}

#[test]
fn truncated_file_reports_position() {
    let dst = tempfile::tempdir().unwrap();
    let path = dst.path().join("truncated.sc");
    write_chunk(&path, &body_items());

    let len = std::fs::metadata(&path).unwrap().len();
    let fh = std::fs::OpenOptions::new().write(true).open(&path).unwrap();
    fh.set_len(len - 3).unwrap();
    drop(fh);

    let results: Vec<_> = FileChunkReader::from_path(&path).unwrap().collect();
    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(results[1].is_ok());
    match &results[2] {
        Err(Error::Corruption { record_index, .. }) => assert_eq!(*record_index, 2),
        other => panic!("expected corruption, got {:?}", other),
    }
}
