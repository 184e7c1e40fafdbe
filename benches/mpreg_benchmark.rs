use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;

use mpreg::mpreg::{CharReader, ChunkWriter, Diversity, Vanilla, transform};

fn generate_text(size: usize, dash_every: usize) -> Vec<u8> {
    let mut data = String::with_capacity(size + 8);
    let mut words = 0;
    while data.len() < size {
        words += 1;
        if words % dash_every == 0 {
            data.push_str("\u{2014}");
        } else {
            data.push_str("caf\u{e9} ");
        }
        if words % 12 == 0 {
            data.push('\n');
        }
    }
    data.into_bytes()
}

fn bench_vanilla(c: &mut Criterion) {
    let mut group = c.benchmark_group("mpreg_vanilla");
    for size_mb in [1, 10] {
        let data = generate_text(size_mb * 1024 * 1024, 20);
        group.throughput(Throughput::Bytes(data.len() as u64));
        for chunk_size in [4096, 65536] {
            group.bench_with_input(
                BenchmarkId::new(format!("chunk{}", chunk_size), format!("{}MB", size_mb)),
                &data,
                |b, data| {
                    b.iter(|| {
                        let reader = CharReader::new(black_box(&data[..]), "bench", chunk_size);
                        let mut writer = ChunkWriter::new(Vec::with_capacity(data.len() * 2), "bench");
                        transform(reader, Vanilla::default(), &mut writer, chunk_size).unwrap()
                    })
                },
            );
        }
    }
    group.finish();
}

fn bench_diversity(c: &mut Criterion) {
    let mut group = c.benchmark_group("mpreg_diversity");
    for dash_every in [2, 50] {
        let data = generate_text(4 * 1024 * 1024, dash_every);
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("dash_every", dash_every),
            &data,
            |b, data| {
                b.iter(|| {
                    let reader = CharReader::new(black_box(&data[..]), "bench", 4096);
                    let mut writer = ChunkWriter::new(Vec::with_capacity(data.len() * 2), "bench");
                    let symbols = Diversity::with_default_pool(StdRng::seed_from_u64(1));
                    transform(reader, symbols, &mut writer, 4096).unwrap()
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_vanilla, bench_diversity);
criterion_main!(benches);
