//! Default generator and entry point functions.

use std::sync::OnceLock;
use std::time::SystemTime;

use crate::{Bid, Generator};

/// Returns the process-wide global generator, creating one if none exists.
fn global_gen() -> &'static Generator {
    static G: OnceLock<Generator> = OnceLock::new();
    G.get_or_init(Generator::new)
}

/// Generates a new identifier stamped with the current time.
///
/// This function employs a process-wide generator: every identifier in the
/// process shares one machine fingerprint, one process id, and one atomic
/// counter.
///
/// # Examples
///
/// ```rust
/// let id = bid::bid();
/// println!("{}", id); // e.g., "XrRPlHwdyRQ2ZzYP"
/// println!("{:?}", id.as_bytes()); // as 12-byte big-endian array
/// ```
pub fn bid() -> Bid {
    global_gen().generate()
}

/// Generates a new identifier stamped with the given time, using the
/// process-wide generator.
///
/// # Examples
///
/// ```rust
/// use std::time::SystemTime;
///
/// let id = bid::bid_at(SystemTime::now());
/// assert!(!id.is_zero());
/// ```
pub fn bid_at(t: SystemTime) -> Bid {
    global_gen().generate_at(t)
}

#[cfg(test)]
mod tests {
    use super::{bid, bid_at, global_gen};
    use std::time::{Duration, UNIX_EPOCH};

    /// Generates fresh nonzero identifiers
    #[test]
    fn generates_fresh_nonzero_identifiers() {
        let a = bid();
        let b = bid();
        assert!(!a.is_zero());
        assert_ne!(a, b);
        assert_eq!(a.machine(), global_gen().machine());
        assert_eq!(a.pid(), std::process::id() as u16);
    }

    /// Stamps identifiers with the supplied time
    #[test]
    fn stamps_identifiers_with_the_supplied_time() {
        let t = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        assert_eq!(bid_at(t).timestamp(), 1_700_000_000);
    }

    /// Generates no duplicate identifiers under multithreading
    #[test]
    fn generates_no_duplicate_identifiers_under_multithreading() {
        use std::{collections::HashSet, sync::mpsc, thread};

        let (tx, rx) = mpsc::channel();
        for _ in 0..4 {
            let tx = tx.clone();
            thread::spawn(move || {
                for _ in 0..10_000 {
                    tx.send(bid()).unwrap();
                }
            });
        }
        drop(tx);

        let mut seen = HashSet::new();
        while let Ok(e) = rx.recv() {
            seen.insert(e);
        }
        assert_eq!(seen.len(), 4 * 10_000);
    }
}
