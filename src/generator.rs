//! Identifier generation.

use std::process;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use sha2::{Digest, Sha256};

use crate::Bid;

/// Represents a stateful identifier constructor that stamps each new [`Bid`]
/// with the current time, the host fingerprint, the process id, and an
/// atomically incremented counter.
///
/// The machine fingerprint and process id are captured once at construction
/// and never change; the counter is the only mutable state and is advanced
/// with a single atomic fetch-and-increment per identifier, so a generator
/// can be shared across threads behind a plain reference.
///
/// # Examples
///
/// ```rust
/// use std::thread;
/// use bid::Generator;
///
/// let g = Generator::new();
/// thread::scope(|s| {
///     for _ in 0..4 {
///         s.spawn(|| {
///             for _ in 0..8 {
///                 println!("{}", g.generate());
///             }
///         });
///     }
/// });
/// ```
#[derive(Debug)]
pub struct Generator {
    machine: [u8; 3],
    pid: u16,
    counter: AtomicU32,
}

impl Generator {
    /// Creates a generator for the current host and process.
    ///
    /// The counter starts from a clock-derived seed rather than zero so
    /// that sequences do not collide across process restarts within the
    /// same second.
    pub fn new() -> Self {
        Self::from_parts(machine_fingerprint(), process::id() as u16, counter_seed())
    }

    /// Creates a generator from explicit state, for embedders and tests.
    pub const fn from_parts(machine: [u8; 3], pid: u16, seed: u32) -> Self {
        Self {
            machine,
            pid,
            counter: AtomicU32::new(seed),
        }
    }

    /// Generates a new identifier stamped with the current time.
    pub fn generate(&self) -> Bid {
        self.generate_at(SystemTime::now())
    }

    /// Generates a new identifier stamped with the given time, truncated to
    /// whole seconds (UTC).
    ///
    /// The counter silently wraps past 2^24; generation never fails.
    pub fn generate_at(&self, t: SystemTime) -> Bid {
        let secs = t
            .duration_since(UNIX_EPOCH)
            .expect("clock may have gone backwards")
            .as_secs() as u32;
        let counter = self.counter.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
        Bid::from_parts(secs, self.machine, self.pid, counter)
    }

    /// Returns the cached machine fingerprint.
    pub const fn machine(&self) -> [u8; 3] {
        self.machine
    }

    /// Returns the cached process id (low 16 bits).
    pub const fn pid(&self) -> u16 {
        self.pid
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

/// Derives the 3-byte host fingerprint: the first three bytes of the
/// hostname's SHA-256, or clock-derived bytes when no hostname is
/// available.
fn machine_fingerprint() -> [u8; 3] {
    match hostname() {
        Some(name) => {
            let digest = Sha256::digest(&name);
            [digest[0], digest[1], digest[2]]
        }
        None => {
            let n = counter_seed();
            [n as u8, (n >> 8) as u8, (n >> 16) as u8]
        }
    }
}

#[cfg(unix)]
fn hostname() -> Option<Vec<u8>> {
    use std::os::unix::ffi::OsStrExt;
    nix::unistd::gethostname()
        .ok()
        .map(|name| name.as_os_str().as_bytes().to_vec())
}

#[cfg(not(unix))]
fn hostname() -> Option<Vec<u8>> {
    None
}

/// Returns the low 32 bits of the current time in nanoseconds.
///
/// The seed only prevents nearby clashes across restarts, so the clock is
/// enough; entropy reads have been seen hanging at boot.
fn counter_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock may have gone backwards")
        .as_nanos() as u32
}
