use std::{collections::HashSet, sync::Arc, thread::scope};

#[cfg(feature = "lock")]
use crate::counter::LockCounter;
use crate::{
    Error,
    counter::{AtomicCounter, COUNTER_MAX, COUNTER_MODULUS, CounterStore},
};

fn run_counter_increments_by_one<C: CounterStore>(counter: &C, seed: u32) {
    counter.set_counter(seed).unwrap();
    for i in 1..=1_000_u32 {
        assert_eq!(counter.next_counter().unwrap(), (seed + i) % COUNTER_MODULUS);
    }
}

fn run_counter_wraps_to_zero<C: CounterStore>(counter: &C) {
    counter.set_counter(COUNTER_MAX - 2).unwrap();
    let issued: Vec<u32> = (0..5).map(|_| counter.next_counter().unwrap()).collect();
    assert_eq!(issued, [COUNTER_MAX - 1, COUNTER_MAX, 0, 1, 2]);
}

fn run_counter_wraps_from_max<C: CounterStore>(counter: &C) {
    counter.set_counter(COUNTER_MAX).unwrap();
    assert_eq!(counter.next_counter().unwrap(), 0);
}

fn run_set_counter_rejects_out_of_range<C: CounterStore>(counter: &C) {
    counter.set_counter(7).unwrap();
    assert_eq!(
        counter.set_counter(COUNTER_MODULUS),
        Err(Error::CounterOutOfRange {
            value: u64::from(COUNTER_MODULUS)
        })
    );
    // A rejected set leaves the value untouched.
    assert_eq!(counter.next_counter().unwrap(), 8);
}

fn run_counter_full_cycle_has_no_duplicates<C: CounterStore>(counter: &C) {
    counter.set_counter(12_345).unwrap();
    let mut seen = vec![false; COUNTER_MODULUS as usize];
    for _ in 0..COUNTER_MODULUS {
        let value = counter.next_counter().unwrap() as usize;
        assert!(!seen[value], "value {value} issued twice within one cycle");
        seen[value] = true;
    }
    // The cycle starts over exactly where it began.
    assert_eq!(counter.next_counter().unwrap(), 12_346);
}

fn run_counter_threaded_no_duplicates<C>(counter: C)
where
    C: CounterStore + Send + Sync,
{
    const THREADS: usize = 8;
    const PER_THREAD: usize = 20_000;

    counter.set_counter(COUNTER_MAX - 1_000).unwrap();
    let counter = Arc::new(counter);
    let seen = Arc::new(std::sync::Mutex::new(HashSet::with_capacity(
        THREADS * PER_THREAD,
    )));

    scope(|s| {
        for _ in 0..THREADS {
            let counter = Arc::clone(&counter);
            let seen = Arc::clone(&seen);
            s.spawn(move || {
                let mut local = Vec::with_capacity(PER_THREAD);
                let mut last = None;
                for _ in 0..PER_THREAD {
                    let value = counter.next_counter().unwrap();
                    // Calls from one thread are causally ordered.
                    if let Some(prev) = last {
                        let step = (value + COUNTER_MODULUS - prev) % COUNTER_MODULUS;
                        assert!(
                            (1..=(THREADS * PER_THREAD) as u32).contains(&step),
                            "counter went backwards: {prev} -> {value}"
                        );
                    }
                    last = Some(value);
                    local.push(value);
                }
                let mut seen = seen.lock().unwrap();
                for value in local {
                    assert!(seen.insert(value), "duplicate counter value {value}");
                }
            });
        }
    });

    assert_eq!(seen.lock().unwrap().len(), THREADS * PER_THREAD);
}

#[test]
fn atomic_counter_increments_by_one() {
    run_counter_increments_by_one(&AtomicCounter::new(0), 16_777_000);
}

#[test]
fn atomic_counter_wraps_to_zero() {
    run_counter_wraps_to_zero(&AtomicCounter::new(0));
}

#[test]
fn atomic_counter_wraps_from_max() {
    run_counter_wraps_from_max(&AtomicCounter::new(0));
}

#[test]
fn atomic_counter_rejects_out_of_range() {
    run_set_counter_rejects_out_of_range(&AtomicCounter::new(0));
}

#[test]
fn atomic_counter_full_cycle_has_no_duplicates() {
    run_counter_full_cycle_has_no_duplicates(&AtomicCounter::new(0));
}

#[test]
fn atomic_counter_threaded_no_duplicates() {
    run_counter_threaded_no_duplicates(AtomicCounter::random());
}

#[test]
fn atomic_counter_masks_seed() {
    let counter = AtomicCounter::new(u32::MAX);
    assert_eq!(counter.current(), COUNTER_MAX);
    assert_eq!(counter.next_counter().unwrap(), 0);
    assert_eq!(counter.current(), 0);
}

#[test]
fn shared_counter_through_arc_and_box() {
    let counter = Arc::new(AtomicCounter::new(10));
    let boxed: Box<dyn CounterStore> = Box::new(Arc::clone(&counter));
    assert_eq!(counter.next_counter().unwrap(), 11);
    assert_eq!(boxed.next_counter().unwrap(), 12);
    assert_eq!(counter.current(), 12);
}

#[cfg(feature = "lock")]
#[test]
fn lock_counter_increments_by_one() {
    run_counter_increments_by_one(&LockCounter::new(0), 16_777_000);
}

#[cfg(feature = "lock")]
#[test]
fn lock_counter_wraps_to_zero() {
    run_counter_wraps_to_zero(&LockCounter::new(0));
}

#[cfg(feature = "lock")]
#[test]
fn lock_counter_wraps_from_max() {
    run_counter_wraps_from_max(&LockCounter::new(0));
}

#[cfg(feature = "lock")]
#[test]
fn lock_counter_rejects_out_of_range() {
    run_set_counter_rejects_out_of_range(&LockCounter::new(0));
}

#[cfg(feature = "lock")]
#[test]
fn lock_counter_threaded_no_duplicates() {
    run_counter_threaded_no_duplicates(LockCounter::random());
}

#[cfg(feature = "lock")]
#[test]
fn lock_counter_clones_share_state() {
    let a = LockCounter::new(5);
    let b = a.clone();
    assert_eq!(a.next_counter().unwrap(), 6);
    assert_eq!(b.next_counter().unwrap(), 7);
}
