use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use fieldvault::{EncryptableUnit, Vault};

fn benchmark_walk(c: &mut Criterion) {
    let mut group = c.benchmark_group("walk");

    // Setup vault once
    let vault = Vault::new();
    vault
        .set_key_group(
            "internal",
            vec!["a1".repeat(32), "b2".repeat(32), "c3".repeat(32)],
        )
        .unwrap();

    let sizes = [("100B", 100), ("1KB", 1024), ("10KB", 10 * 1024)];
    const UNITS: usize = 16;

    for (name, size) in sizes {
        let body = "x".repeat(size);
        let record: Vec<EncryptableUnit> =
            (0..UNITS).map(|_| EncryptableUnit::new(body.as_str())).collect();

        group.throughput(Throughput::Bytes((size * UNITS) as u64));
        group.bench_with_input(
            criterion::BenchmarkId::new("encrypt", name),
            &record,
            |b, record| {
                b.iter_batched(
                    || record.clone(),
                    |mut fresh| vault.encrypt(black_box(&mut fresh)).unwrap(),
                    BatchSize::SmallInput,
                );
            },
        );

        let mut sealed = record.clone();
        vault.encrypt(&mut sealed).unwrap();
        group.bench_with_input(
            criterion::BenchmarkId::new("decrypt", name),
            &sealed,
            |b, sealed| {
                b.iter_batched(
                    || sealed.clone(),
                    |mut fresh| vault.decrypt(black_box(&mut fresh)).unwrap(),
                    BatchSize::SmallInput,
                );
            },
        );
    }
    group.finish();
}

criterion_group!(benches, benchmark_walk);
criterion_main!(benches);
