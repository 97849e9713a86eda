//! Grouping and per-group aggregation.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;

use hwcatalog_foundation::{Error, Result, Value};

use crate::predicate::Path;

/// An aggregate computed over the members of a group.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Aggregate {
    /// Number of members.
    Count,
    /// Smallest non-nil value of the path, or nil if there is none.
    Min(Path),
    /// Largest non-nil value of the path, or nil if there is none.
    Max(Path),
}

impl Aggregate {
    /// The path read from each member, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Count => None,
            Self::Min(path) | Self::Max(path) => Some(path),
        }
    }
}

/// Partitions rows by key.
///
/// Every row lands in exactly one partition. Partitions appear in the order
/// their keys were first seen, and rows keep their input order within a
/// partition.
///
/// # Errors
///
/// Returns the first error raised by `key`.
pub fn partition<T, K>(
    rows: Vec<T>,
    mut key: impl FnMut(&T) -> Result<K>,
) -> Result<Vec<(K, Vec<T>)>>
where
    K: Hash + Eq + Clone,
{
    let mut slots: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<T>)> = Vec::new();
    for row in rows {
        let k = key(&row)?;
        if let Some(&slot) = slots.get(&k) {
            groups[slot].1.push(row);
        } else {
            slots.insert(k.clone(), groups.len());
            groups.push((k, vec![row]));
        }
    }
    Ok(groups)
}

/// Computes aggregates over one group's members.
///
/// `read` resolves an aggregate's path against a member.
///
/// # Errors
///
/// Returns the first error raised by `read`, or `Internal` if a count does
/// not fit an `i64`.
pub fn aggregate<T>(
    members: &[T],
    aggregates: &[Aggregate],
    mut read: impl FnMut(&T, &Path) -> Result<Value>,
) -> Result<Vec<Value>> {
    aggregates
        .iter()
        .map(|aggregate| match aggregate {
            Aggregate::Count => i64::try_from(members.len())
                .map(Value::Int)
                .map_err(|_| Error::internal("group too large")),
            Aggregate::Min(path) => extreme(members, path, &mut read, Ordering::Less),
            Aggregate::Max(path) => extreme(members, path, &mut read, Ordering::Greater),
        })
        .collect()
}

fn extreme<T>(
    members: &[T],
    path: &Path,
    read: &mut impl FnMut(&T, &Path) -> Result<Value>,
    wanted: Ordering,
) -> Result<Value> {
    let mut best = Value::Nil;
    for member in members {
        let value = read(member, path)?;
        if value.is_nil() {
            continue;
        }
        if best.is_nil() || value.sort_cmp(&best) == wanted {
            best = value;
        }
    }
    Ok(best)
}
