//! Multi-key stable ordering.

use std::cmp::Ordering;

use hwcatalog_foundation::{Result, Value};

use crate::predicate::Path;

/// Sort direction for one key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

/// One ordering key: a path read from each row, and a direction.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OrderKey {
    /// Path evaluated with `this` bound to the row.
    pub path: Path,
    /// Direction.
    pub direction: Direction,
}

impl OrderKey {
    /// Ascending on `path`.
    #[must_use]
    pub fn asc(path: Path) -> Self {
        Self {
            path,
            direction: Direction::Ascending,
        }
    }

    /// Descending on `path`.
    #[must_use]
    pub fn desc(path: Path) -> Self {
        Self {
            path,
            direction: Direction::Descending,
        }
    }
}

/// Compares two key tuples lexicographically.
///
/// Keys beyond the end of `directions` sort ascending. Values use
/// [`Value::sort_cmp`], a total order.
#[must_use]
pub fn compare_keys(a: &[Value], b: &[Value], directions: &[Direction]) -> Ordering {
    for (i, (x, y)) in a.iter().zip(b).enumerate() {
        let ordering = match directions.get(i).copied().unwrap_or_default() {
            Direction::Ascending => x.sort_cmp(y),
            Direction::Descending => y.sort_cmp(x),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    a.len().cmp(&b.len())
}

/// Sorts rows by computed key tuples.
///
/// Each row's keys are computed once. The sort is stable, so rows with
/// equal keys keep their input order.
///
/// # Errors
///
/// Returns the first error raised by `keys`.
pub fn sort_by_keys<T>(
    rows: Vec<T>,
    directions: &[Direction],
    mut keys: impl FnMut(&T) -> Result<Vec<Value>>,
) -> Result<Vec<T>> {
    let mut decorated = rows
        .into_iter()
        .map(|row| Ok((keys(&row)?, row)))
        .collect::<Result<Vec<_>>>()?;
    decorated.sort_by(|(a, _), (b, _)| compare_keys(a, b, directions));
    Ok(decorated.into_iter().map(|(_, row)| row).collect())
}
