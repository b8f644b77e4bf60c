use std::{
    sync::OnceLock,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use oxid::{
    Error, Result,
    counter::{CounterStore, check_counter},
    generator::XidGenerator,
    id::{Xid, machine_ints},
    identity::IdentityContext,
    inspect,
    time::SystemClock,
};
use pgrx::prelude::*;

pgrx::pg_module_magic!();

// ============================================================================
// COUNTER
// ============================================================================

/// Name of the cyclic sequence backing the counter.
const SEQUENCE: &str = "xid_serial";

/// The `xid_serial` sequence as a [`CounterStore`].
///
/// Every backend draws from the same persisted sequence, so counters stay
/// unique across connections and survive restarts. The sequence is created
/// with `MINVALUE 0 MAXVALUE 16777215 CYCLE`, which gives the same wraparound
/// as the in-process counters.
#[derive(Clone, Copy, Debug, Default)]
pub struct SequenceCounter;

impl SequenceCounter {
    fn unavailable(err: impl core::fmt::Display) -> Error {
        Error::CounterStoreUnavailable {
            reason: err.to_string(),
        }
    }

    fn checked(value: i64) -> Result<u32> {
        match u32::try_from(value) {
            Ok(value) => check_counter(value),
            Err(_) => Err(Error::CounterOutOfRange {
                value: value as u64,
            }),
        }
    }
}

impl CounterStore for SequenceCounter {
    fn next_counter(&self) -> Result<u32> {
        let value = Spi::get_one::<i64>(&format!("SELECT nextval('{SEQUENCE}')"))
            .map_err(Self::unavailable)?
            .ok_or_else(|| Self::unavailable("nextval returned NULL"))?;
        Self::checked(value)
    }

    fn set_counter(&self, value: u32) -> Result<()> {
        let value = check_counter(value)?;
        Spi::run(&format!("SELECT setval('{SEQUENCE}', {value})")).map_err(Self::unavailable)
    }
}

// ============================================================================
// IDENTITY
// ============================================================================

static IDENTITY: OnceLock<IdentityContext> = OnceLock::new();

/// Identity of this backend, resolved on first use.
///
/// Malformed `OXID_MACHINE_ID` / `OXID_PID` overrides are reported and
/// ignored rather than failing every call.
fn identity() -> IdentityContext {
    *IDENTITY.get_or_init(|| {
        let identity = IdentityContext::from_env().unwrap_or_else(|e| {
            pgrx::warning!("ignoring identity override: {}", e);
            IdentityContext::detect()
        });
        pgrx::debug1!(
            "xid identity: machine={:02x?} pid={}",
            identity.machine(),
            identity.pid()
        );
        identity
    })
}

fn generator() -> XidGenerator<SequenceCounter, SystemClock> {
    XidGenerator::new(identity(), SequenceCounter, SystemClock)
}

/// Unwraps `result`, raising a PostgreSQL `ERROR` on failure.
fn or_raise<T>(result: Result<T>) -> T {
    result.unwrap_or_else(|e| pgrx::error!("{}", e))
}

// ============================================================================
// TIME CONVERSION
// ============================================================================

// PostgreSQL epoch: 2000-01-01 00:00:00 UTC Unix epoch: 1970-01-01 00:00:00 UTC
// Difference: 946684800 seconds = 946684800000000 microseconds
const PG_EPOCH_OFFSET_MICROS: i64 = 946_684_800_000_000;

fn timestamptz_to_system_time(ts: TimestampWithTimeZone) -> SystemTime {
    let pg_micros: i64 = ts
        .try_into()
        .unwrap_or_else(|e| pgrx::error!("invalid timestamp: {}", e));

    let unix_micros = pg_micros.saturating_add(PG_EPOCH_OFFSET_MICROS);
    let offset = Duration::from_micros(unix_micros.unsigned_abs());
    if unix_micros >= 0 {
        UNIX_EPOCH + offset
    } else {
        UNIX_EPOCH - offset
    }
}

fn system_time_to_timestamptz(at: SystemTime) -> TimestampWithTimeZone {
    let unix_micros = match at.duration_since(UNIX_EPOCH) {
        Ok(after) => i64::try_from(after.as_micros()).unwrap_or(i64::MAX),
        Err(before) => i64::try_from(before.duration().as_micros()).map_or(i64::MIN, |m| -m),
    };
    let pg_micros = unix_micros.saturating_sub(PG_EPOCH_OFFSET_MICROS);

    TimestampWithTimeZone::try_from(pg_micros)
        .unwrap_or_else(|e| pgrx::error!("timestamp out of range: {}", e))
}

// ============================================================================
// GENERATION
// ============================================================================

/// Generate a new xid, optionally stamped with `_at` instead of the current
/// time.
///
/// Takes the next value of `xid_serial` as its counter.
#[pg_extern(parallel_unsafe)]
fn xid(_at: default!(Option<TimestampWithTimeZone>, "NULL")) -> String {
    let at = _at.map(timestamptz_to_system_time);
    or_raise(generator().generate(at))
}

// ============================================================================
// ENCODING
// ============================================================================

/// Encode 12 bytes, given as integers in 0..=255, to the text form.
#[pg_extern(immutable, parallel_safe, strict)]
fn xid_encode(bytes: Vec<i32>) -> String {
    or_raise(Xid::try_from_ints(&bytes)).encode()
}

/// Decode the text form to its 12 bytes as integers.
#[pg_extern(immutable, parallel_safe, strict)]
fn xid_decode(text: &str) -> Vec<i32> {
    or_raise(Xid::decode(text)).to_ints().to_vec()
}

// ============================================================================
// INSPECTION
// ============================================================================

/// The time embedded in an xid, at second resolution.
#[pg_extern(immutable, parallel_safe, strict)]
fn xid_time(text: &str) -> TimestampWithTimeZone {
    system_time_to_timestamptz(or_raise(inspect::time_of(text)))
}

/// The 24-bit counter embedded in an xid.
#[pg_extern(immutable, parallel_safe, strict)]
fn xid_counter(text: &str) -> i32 {
    let counter = or_raise(inspect::counter_of(text));
    i32::try_from(counter).unwrap_or_else(|e| pgrx::error!("counter overflowed int: {}", e))
}

/// The process ID embedded in an xid.
#[pg_extern(immutable, parallel_safe, strict)]
fn xid_pid(text: &str) -> i32 {
    i32::from(or_raise(inspect::pid_of(text)))
}

/// The 3-byte machine fingerprint embedded in an xid, as integers.
#[pg_extern(immutable, parallel_safe, strict)]
fn xid_machine(text: &str) -> Vec<i32> {
    machine_ints(or_raise(inspect::machine_of(text))).to_vec()
}

// ============================================================================
// UTILITY FUNCTIONS
// ============================================================================

/// Check if a string is a valid xid
#[pg_extern(immutable, parallel_safe, strict)]
fn xid_is_valid(text: &str) -> bool {
    inspect::is_valid(text)
}

// ============================================================================
// SQL OBJECTS
// ============================================================================
extension_sql!(
    r#"
CREATE SEQUENCE xid_serial MINVALUE 0 MAXVALUE 16777215 CYCLE;
SELECT setval('xid_serial', floor(random() * 16777216)::bigint);
"#,
    name = "xid_serial",
    bootstrap
);
extension_sql!(
    r#"
COMMENT ON SEQUENCE xid_serial IS 'Cyclic 24-bit counter embedded in every generated xid';
COMMENT ON FUNCTION xid(timestamptz) IS 'Generate a new xid, stamped with the given time or now';
COMMENT ON FUNCTION xid_encode(integer[]) IS 'Encode 12 bytes (0..=255) to the 20 character xid text form';
COMMENT ON FUNCTION xid_decode(text) IS 'Decode an xid to its 12 bytes';
COMMENT ON FUNCTION xid_time(text) IS 'Time embedded in an xid, at second resolution';
COMMENT ON FUNCTION xid_counter(text) IS 'Counter embedded in an xid';
COMMENT ON FUNCTION xid_pid(text) IS 'Process ID embedded in an xid';
COMMENT ON FUNCTION xid_machine(text) IS 'Machine fingerprint embedded in an xid, as 3 integers';
COMMENT ON FUNCTION xid_is_valid(text) IS 'Check if a text string is a valid xid';
"#,
    name = "add_comments",
    requires = [
        "xid_serial",
        xid,
        xid_encode,
        xid_decode,
        xid_time,
        xid_counter,
        xid_pid,
        xid_machine,
        xid_is_valid
    ]
);

// ============================================================================
// TESTS
// ============================================================================

#[cfg(any(test, feature = "pg_test"))]
#[pg_schema]
mod tests {
    use super::*;

    const SAMPLE: &str = "9m4e2mr0ui3e8a215n4g";
    const SAMPLE_INTS: [i32; 12] = [77, 136, 225, 91, 96, 244, 134, 228, 40, 65, 45, 201];
    const MODULUS: u32 = 16_777_216;

    fn now_micros() -> i64 {
        let now = Spi::get_one::<TimestampWithTimeZone>("SELECT clock_timestamp()")
            .unwrap()
            .unwrap();
        now.try_into().unwrap()
    }

    // ========================================================================
    // Counter Tests
    // ========================================================================

    /// Verify the sequence exists with the 24-bit cyclic bounds
    #[pg_test]
    fn sequence_properties() {
        let (min, max, cycle) = Spi::get_three::<i64, i64, bool>(
            "SELECT min_value, max_value, cycle FROM pg_sequences WHERE sequencename = 'xid_serial'",
        )
        .unwrap();
        assert_eq!(min, Some(0));
        assert_eq!(max, Some(16_777_215));
        assert_eq!(cycle, Some(true));
    }

    /// Verify the counter wraps to zero after 16777215
    #[pg_test]
    fn counter_cycles() {
        let start = MODULUS - 100;
        Spi::run(&format!("SELECT setval('xid_serial', {})", start - 1)).unwrap();

        for i in 0..200 {
            let id = xid(None);
            assert_eq!(
                xid_counter(&id) as u32,
                (start + i) % MODULUS,
                "sample {i}: {id}"
            );
        }
    }

    /// Verify SequenceCounter::set_counter positions the next nextval
    #[pg_test]
    fn counter_store_administration() {
        SequenceCounter.set_counter(16_777_215).unwrap();
        assert_eq!(SequenceCounter.next_counter().unwrap(), 0);
        assert_eq!(SequenceCounter.next_counter().unwrap(), 1);

        assert!(matches!(
            SequenceCounter.set_counter(16_777_216),
            Err(Error::CounterOutOfRange { value: 16_777_216 })
        ));
    }

    /// Verify generation via SQL draws from the sequence
    #[pg_test]
    fn generation_from_sql() {
        Spi::run("SELECT setval('xid_serial', 41)").unwrap();
        let id = Spi::get_one::<String>("SELECT xid()").unwrap().unwrap();
        assert_eq!(inspect::counter_of(&id).unwrap(), 42);

        let count = Spi::get_one::<i64>(
            "SELECT COUNT(DISTINCT x) FROM (SELECT xid() AS x FROM generate_series(1, 1000)) s",
        )
        .unwrap()
        .unwrap();
        assert_eq!(count, 1000, "Generated xids should be distinct");
    }

    // ========================================================================
    // Generation Tests
    // ========================================================================

    /// Verify current-time xids fall in the call window and count up by one
    #[pg_test]
    fn generation_window() {
        let start = now_micros() - 1_000_000;
        let ids: Vec<String> = (0..100).map(|_| xid(None)).collect();
        let end = now_micros();

        let mut last: Option<u32> = None;
        for id in &ids {
            let t: i64 = xid_time(id).try_into().unwrap();
            assert!(start < t, "{t} not after {start}");
            assert!(t < end, "{t} not before {end}");

            let counter = inspect::counter_of(id).unwrap();
            if let Some(prev) = last {
                assert_eq!((prev + 1) % MODULUS, counter);
            }
            last = Some(counter);
        }
    }

    /// Verify the identity of the backend is embedded
    #[pg_test]
    fn generation_embeds_identity() {
        let identity = identity();
        let id = xid(None);
        assert_eq!(xid_pid(&id), i32::from(identity.pid()));
        assert_eq!(xid_machine(&id), machine_ints(identity.machine()).to_vec());
    }

    /// Verify explicit timestamps are embedded truncated to the second
    #[pg_test]
    fn generation_at() {
        let at = Spi::get_one::<TimestampWithTimeZone>(
            "SELECT '2024-01-01 10:00:00.750+00'::timestamptz",
        )
        .unwrap()
        .unwrap();
        let expected = Spi::get_one::<TimestampWithTimeZone>(
            "SELECT '2024-01-01 10:00:00+00'::timestamptz",
        )
        .unwrap()
        .unwrap();

        let id = xid(Some(at));
        assert_eq!(xid_time(&id), expected);
        assert_eq!(Xid::decode(&id).unwrap().timestamp(), 1_704_103_200);
    }

    /// Verify the named `_at` argument from SQL
    #[pg_test]
    fn generation_at_from_sql() {
        let matches = Spi::get_one::<bool>(
            "SELECT xid_time(xid(_at => '2020-06-01 12:34:56.999+00'::timestamptz)) \
             = '2020-06-01 12:34:56+00'::timestamptz",
        )
        .unwrap()
        .unwrap();
        assert!(matches);
    }

    /// Verify a batch of past instants keeps consecutive counters
    #[pg_test]
    fn generation_at_many() {
        let now = now_micros();
        let mut last: Option<u32> = None;
        for i in 0..100_i64 {
            let micros = now - i * (3_000 + 3_600_000_000 + 60_000_000 + 1_000_000);
            let id = xid(Some(TimestampWithTimeZone::try_from(micros).unwrap()));

            let embedded: i64 = xid_time(&id).try_into().unwrap();
            let unix = micros + PG_EPOCH_OFFSET_MICROS;
            assert_eq!(embedded + PG_EPOCH_OFFSET_MICROS, unix - unix % 1_000_000);

            let counter = inspect::counter_of(&id).unwrap();
            if let Some(prev) = last {
                assert_eq!((prev + 1) % MODULUS, counter);
            }
            last = Some(counter);
        }
    }

    /// Verify timestamps before the unix epoch are rejected
    #[pg_test(error = "timestamp out of range: -1s relative to the unix epoch")]
    fn generation_before_epoch() {
        Spi::run("SELECT xid('1969-12-31 23:59:59+00'::timestamptz)").unwrap();
    }

    // ========================================================================
    // Encoding Tests
    // ========================================================================

    /// Verify encoding a known byte array
    #[pg_test]
    fn encoding_known_value() {
        let encoded = Spi::get_one::<String>(
            "SELECT xid_encode(ARRAY[77, 136, 225, 91, 96, 244, 134, 228, 40, 65, 45, 201])",
        )
        .unwrap()
        .unwrap();
        assert_eq!(encoded, SAMPLE);
    }

    /// Verify encode and decode invert each other on generated values
    #[pg_test]
    fn encoding_round_trip() {
        for _ in 0..100 {
            let id = xid(None);
            assert_eq!(xid_encode(xid_decode(&id)), id);
        }
    }

    #[pg_test(error = "invalid byte array length: expected 12, got 3")]
    fn encoding_wrong_length() {
        Spi::run("SELECT xid_encode(ARRAY[1, 2, 3])").unwrap();
    }

    #[pg_test(error = "byte value 256 at index 11 is out of range 0..=255")]
    fn encoding_byte_out_of_range() {
        Spi::run("SELECT xid_encode(ARRAY[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 256])").unwrap();
    }

    // ========================================================================
    // Decoding Tests
    // ========================================================================

    /// Verify decoding a known string
    #[pg_test]
    fn decoding_known_value() {
        let ints = Spi::get_one::<Vec<i32>>(&format!("SELECT xid_decode('{SAMPLE}')"))
            .unwrap()
            .unwrap();
        assert_eq!(ints, SAMPLE_INTS);
    }

    #[pg_test(error = "invalid xid: invalid length: expected 20 characters, got 3")]
    fn decoding_wrong_length() {
        Spi::run("SELECT xid_decode('abc')").unwrap();
    }

    #[pg_test(error = "invalid xid: invalid character 0x77 at index 0")]
    fn decoding_out_of_alphabet() {
        Spi::run("SELECT xid_decode('wm4e2mr0ui3e8a215n4g')").unwrap();
    }

    // ========================================================================
    // Inspection Tests
    // ========================================================================

    /// Verify each component of a known xid
    #[pg_test]
    fn inspection_known_value() {
        let expected = Spi::get_one::<TimestampWithTimeZone>(
            "SELECT to_timestamp(1300816219)",
        )
        .unwrap()
        .unwrap();
        assert_eq!(xid_time(SAMPLE), expected);
        assert_eq!(xid_counter(SAMPLE), 4_271_561);
        assert_eq!(xid_pid(SAMPLE), 58_408);
        assert_eq!(xid_machine(SAMPLE), vec![0x60, 0xf4, 0x86]);
    }

    /// Verify inspection from SQL
    #[pg_test]
    fn inspection_from_sql() {
        let counter = Spi::get_one::<i32>(&format!("SELECT xid_counter('{SAMPLE}')"))
            .unwrap()
            .unwrap();
        let pid = Spi::get_one::<i32>(&format!("SELECT xid_pid('{SAMPLE}')"))
            .unwrap()
            .unwrap();
        let machine = Spi::get_one::<Vec<i32>>(&format!("SELECT xid_machine('{SAMPLE}')"))
            .unwrap()
            .unwrap();
        assert_eq!(counter, 4_271_561);
        assert_eq!(pid, 58_408);
        assert_eq!(machine, vec![96, 244, 134]);
    }

    #[pg_test(error = "malformed identifier: invalid length: expected 20 characters, got 0")]
    fn inspection_malformed() {
        Spi::run("SELECT xid_counter('')").unwrap();
    }

    // ========================================================================
    // Utility Tests
    // ========================================================================

    #[pg_test]
    fn validation() {
        assert!(xid_is_valid(SAMPLE));
        assert!(xid_is_valid(&xid(None)));
        assert!(!xid_is_valid(""));
        assert!(!xid_is_valid("9M4E2MR0UI3E8A215N4G"));
        assert!(!xid_is_valid("9m4e2mr0ui3e8a215n4h"));
    }

    /// Verify text order follows generation order within a second
    #[pg_test]
    fn ordering_within_a_second() {
        let at = Spi::get_one::<TimestampWithTimeZone>("SELECT '2024-01-01'::timestamptz")
            .unwrap()
            .unwrap();
        Spi::run("SELECT setval('xid_serial', 0)").unwrap();
        let ids: Vec<String> = (0..100).map(|_| xid(Some(at))).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }
}
