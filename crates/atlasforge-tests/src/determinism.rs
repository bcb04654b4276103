//! Determinism checks for repeated builds.
//!
//! Atlas builds must be byte-identical for unchanged inputs. These helpers run
//! a producer several times and report the first byte that differs.

use std::fmt;

/// Result of a determinism verification.
#[derive(Debug, Clone)]
pub struct DeterminismResult {
    /// Whether all runs produced identical output.
    pub is_deterministic: bool,
    /// Number of runs performed.
    pub runs: usize,
    /// BLAKE3 hash of the first run's output.
    pub hash: String,
    /// First difference found, if any.
    pub diff: Option<DiffInfo>,
}

/// The first byte difference between the reference run and a later run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffInfo {
    /// Byte offset of the difference.
    pub offset: usize,
    /// Byte from the first run, `None` past its end.
    pub expected: Option<u8>,
    /// Byte from the differing run, `None` past its end.
    pub actual: Option<u8>,
    /// Which run (0-indexed) differed.
    pub run_index: usize,
}

impl fmt::Display for DiffInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let byte = |b: Option<u8>| match b {
            Some(b) => format!("0x{:02X}", b),
            None => "EOF".to_string(),
        };
        write!(
            f,
            "Difference at byte {}: expected {}, got {} (run {})",
            self.offset,
            byte(self.expected),
            byte(self.actual),
            self.run_index
        )
    }
}

/// Offset of the first differing byte, including length differences.
pub fn first_difference(a: &[u8], b: &[u8]) -> Option<usize> {
    a.iter()
        .zip(b)
        .position(|(x, y)| x != y)
        .or_else(|| (a.len() != b.len()).then(|| a.len().min(b.len())))
}

/// Run `produce` `runs` times and compare every output with the first.
///
/// # Panics
/// Panics if `runs < 2`.
pub fn verify_determinism<F, O>(produce: F, runs: usize) -> DeterminismResult
where
    F: Fn() -> O,
    O: AsRef<[u8]>,
{
    assert!(runs >= 2, "Must run at least 2 times to verify determinism");

    let reference = produce();
    let reference = reference.as_ref();
    let hash = blake3::hash(reference).to_hex().to_string();

    for run_index in 1..runs {
        let output = produce();
        let output = output.as_ref();
        if let Some(offset) = first_difference(reference, output) {
            return DeterminismResult {
                is_deterministic: false,
                runs,
                hash,
                diff: Some(DiffInfo {
                    offset,
                    expected: reference.get(offset).copied(),
                    actual: output.get(offset).copied(),
                    run_index,
                }),
            };
        }
    }

    DeterminismResult {
        is_deterministic: true,
        runs,
        hash,
        diff: None,
    }
}
