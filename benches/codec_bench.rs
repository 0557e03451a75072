use std::io::Cursor;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use streamchunk::annotate::{Annotate, AnnotationMerge, WordTagger};
use streamchunk::io::{ChunkReader, ChunkWriter};
use streamchunk::record::StreamItem;

const NB_RECORDS: usize = 250;

fn gen_items(words: usize) -> Vec<StreamItem> {
    let tagger = WordTagger::new("words", AnnotationMerge::default());
    (0..NB_RECORDS)
        .map(|i| {
            let text = (0..words)
                .map(|w| format!("word{w}"))
                .collect::<Vec<_>>()
                .join(" ");
            let mut item = StreamItem::new(&i.to_string(), &text);
            tagger.annotate(&mut item).unwrap();
            item
        })
        .collect()
}

fn write_all(items: &[StreamItem]) -> Vec<u8> {
    let mut wr = ChunkWriter::new(Vec::new());
    wr.extend(items).unwrap();
    wr.into_inner().unwrap()
}

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("chunk");
    for words in [10, 100, 1000] {
        let items = gen_items(words);
        let bytes = write_all(&items);
        group.throughput(Throughput::Bytes(bytes.len() as u64));

        group.bench_with_input(BenchmarkId::new("write", words), &items, |b, items| {
            b.iter(|| write_all(items))
        });
        group.bench_with_input(BenchmarkId::new("read", words), &bytes, |b, bytes| {
            b.iter(|| ChunkReader::new(Cursor::new(bytes)).count())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_codec);
criterion_main!(benches);
