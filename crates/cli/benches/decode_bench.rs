use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use filter::EventFilterSyntax;
use settings::{decode, decode_file, AcceptAll, BlobWriter, DEFAULT_MAX_BLOB_BYTES};
use tempfile::tempdir;

const N_BLOCKS: usize = 1_000;

fn build_blob() -> BlobWriter {
    let mut w = BlobWriter::new();
    for i in 0..N_BLOCKS {
        w.block(
            format!("block{}", i),
            "",
            format!("protocol=imap AND local_name=\"mail{}.example.com\"", i),
            "",
        );
    }
    w
}

fn decode_accept_all_benchmark(c: &mut Criterion) {
    let data = build_blob().to_bytes().unwrap();
    c.bench_function("decode_1k_blocks_no_validation", |b| {
        b.iter(|| {
            let doc = decode(&data, &AcceptAll).unwrap();
            assert_eq!(doc.len(), N_BLOCKS);
        });
    });
}

fn decode_with_filters_benchmark(c: &mut Criterion) {
    let data = build_blob().to_bytes().unwrap();
    c.bench_function("decode_1k_blocks_with_filter_parse", |b| {
        b.iter(|| {
            let doc = decode(&data, &EventFilterSyntax).unwrap();
            assert_eq!(doc.len(), N_BLOCKS);
        });
    });
}

fn decode_file_benchmark(c: &mut Criterion) {
    c.bench_function("decode_file_1k_blocks", |b| {
        b.iter_batched(
            || {
                let dir = tempdir().unwrap();
                let path = dir.path().join("config.bin");
                build_blob().write_file(&path).unwrap();
                (dir, path)
            },
            |(_dir, path)| {
                let doc = decode_file(&path, DEFAULT_MAX_BLOB_BYTES, &EventFilterSyntax).unwrap();
                assert_eq!(doc.len(), N_BLOCKS);
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    benches,
    decode_accept_all_benchmark,
    decode_with_filters_benchmark,
    decode_file_benchmark
);
criterion_main!(benches);
