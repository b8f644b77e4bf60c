use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
#[cfg(feature = "lock")]
use oxid::counter::LockCounter;
use oxid::{
    counter::{AtomicCounter, CounterStore},
    generator::XidGenerator,
    id::{Xid, XidBuf},
    identity::IdentityContext,
    time::{MonotonicClock, SystemClock, TimeSource},
};
use std::{
    sync::{Arc, Barrier},
    thread::scope,
    time::{Duration, Instant, SystemTime, UNIX_EPOCH},
};

struct FixedMockTime {
    secs: u64,
}

impl TimeSource for FixedMockTime {
    fn now(&self) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(self.secs)
    }
}

// Number of IDs generated per benchmark iteration (per-thread for
// multi-threaded).
const TOTAL_IDS: usize = 4096;

const IDENTITY: IdentityContext = IdentityContext::new([0x60, 0xf4, 0x86], 0xe428);

/// Benchmarks single-threaded generation through a given counter store.
fn bench_generator<C, T>(c: &mut Criterion, group_name: &str, factory: impl Fn() -> XidGenerator<C, T>)
where
    C: CounterStore,
    T: TimeSource,
{
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let generator = factory();
            let start = Instant::now();
            for _ in 0..iters {
                for _ in 0..TOTAL_IDS {
                    black_box(generator.next_xid(None).unwrap());
                }
            }
            start.elapsed()
        });
    });

    group.finish();
}

/// Benchmarks contended generation with one shared generator.
fn bench_generator_threaded<C, T>(
    c: &mut Criterion,
    group_name: &str,
    factory: impl Fn() -> XidGenerator<C, T>,
) where
    C: CounterStore + Send + Sync,
    T: TimeSource + Send + Sync,
{
    let mut group = c.benchmark_group(group_name);

    for threads in [1, 2, 4, 8] {
        group.throughput(Throughput::Elements((threads * TOTAL_IDS) as u64));
        group.bench_function(format!("threads/{threads}/elems/{TOTAL_IDS}"), |b| {
            b.iter_custom(|iters| {
                let generator = factory();
                let barrier = Arc::new(Barrier::new(threads + 1));
                let start = scope(|s| {
                    for _ in 0..threads {
                        let barrier = Arc::clone(&barrier);
                        let generator = &generator;
                        s.spawn(move || {
                            barrier.wait();
                            for _ in 0..iters {
                                for _ in 0..TOTAL_IDS {
                                    black_box(generator.next_xid(None).unwrap());
                                }
                            }
                        });
                    }
                    barrier.wait();
                    Instant::now()
                });
                start.elapsed()
            });
        });
    }

    group.finish();
}

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    group.throughput(Throughput::Elements(1));

    let id = Xid::from_components(1_700_000_000, [0x60, 0xf4, 0x86], 0xe428, 0x41_2dc9);
    let encoded = id.encode();

    group.bench_function("encode_to_buf", |b| {
        let mut buf = XidBuf::default();
        b.iter(|| {
            black_box(black_box(id).encode_to_buf(&mut buf).len());
        });
    });
    group.bench_function("encode", |b| b.iter(|| black_box(black_box(id).encode())));
    group.bench_function("decode", |b| {
        b.iter(|| black_box(Xid::decode(black_box(&encoded)).unwrap()));
    });

    group.finish();
}

fn benches(c: &mut Criterion) {
    bench_codec(c);

    bench_generator(c, "generator/atomic/fixed", || {
        XidGenerator::new(IDENTITY, AtomicCounter::new(0), FixedMockTime { secs: 1_700_000_000 })
    });
    bench_generator(c, "generator/atomic/system", || {
        XidGenerator::new(IDENTITY, AtomicCounter::new(0), SystemClock)
    });
    bench_generator(c, "generator/atomic/monotonic", || {
        XidGenerator::new(IDENTITY, AtomicCounter::new(0), MonotonicClock::new())
    });
    #[cfg(feature = "lock")]
    bench_generator(c, "generator/lock/fixed", || {
        XidGenerator::new(IDENTITY, LockCounter::new(0), FixedMockTime { secs: 1_700_000_000 })
    });

    bench_generator_threaded(c, "generator_threaded/atomic/system", || {
        XidGenerator::new(IDENTITY, AtomicCounter::new(0), SystemClock)
    });
    #[cfg(feature = "lock")]
    bench_generator_threaded(c, "generator_threaded/lock/system", || {
        XidGenerator::new(IDENTITY, LockCounter::new(0), SystemClock)
    });
}

criterion_group!(all, benches);
criterion_main!(all);
