//! Existential join strategies.
//!
//! Both resolvers short-circuit on the first satisfying binding and
//! propagate the first error raised by the body.

use hwcatalog_foundation::Result;
use tracing::trace;

/// Returns true if some candidate satisfies `test`.
///
/// # Errors
///
/// Returns the first error raised by `test`.
pub fn exists_one<T: Copy>(
    candidates: &[T],
    mut test: impl FnMut(T) -> Result<bool>,
) -> Result<bool> {
    for &candidate in candidates {
        if test(candidate)? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Returns true if some ordered pair of candidates satisfies `test`.
///
/// Fewer than two candidates never match, whatever `distinct` says. With
/// `distinct`, a candidate is never paired with itself; both orders of
/// every other pair are tried, so `test` need not be symmetric.
///
/// # Errors
///
/// Returns the first error raised by `test`.
pub fn exists_pair<T: Copy>(
    candidates: &[T],
    distinct: bool,
    mut test: impl FnMut(T, T) -> Result<bool>,
) -> Result<bool> {
    if candidates.len() < 2 {
        return Ok(false);
    }
    let mut examined = 0usize;
    for (i, &first) in candidates.iter().enumerate() {
        for (j, &second) in candidates.iter().enumerate() {
            if distinct && i == j {
                continue;
            }
            examined += 1;
            if test(first, second)? {
                trace!(candidates = candidates.len(), examined, "pair join matched");
                return Ok(true);
            }
        }
    }
    trace!(candidates = candidates.len(), examined, "pair join exhausted");
    Ok(false)
}
