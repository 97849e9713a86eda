//! One-to-many relationship links with bidirectional indices.
//!
//! A link connects an owner (e.g. a company) to a set of members (e.g. the
//! laptops it makes). Each member has at most one owner. The forward set and
//! the reverse owner are updated together, so traversal in either direction
//! always agrees.

use std::fmt;
use std::hash::Hash;

use hwcatalog_foundation::{Error, Result};

/// Stores one relationship as forward sets plus a reverse owner map.
///
/// - Forward: owner -> set of members
/// - Reverse: member -> owner
#[derive(Clone)]
pub struct LinkIndex<O, M>
where
    O: Clone + Eq + Hash,
    M: Clone + Eq + Hash,
{
    /// Name used in integrity errors.
    name: &'static str,
    forward: im::HashMap<O, im::HashSet<M>>,
    reverse: im::HashMap<M, O>,
}

impl<O, M> LinkIndex<O, M>
where
    O: Copy + Eq + Hash + fmt::Debug,
    M: Copy + Eq + Hash + fmt::Debug,
{
    /// Creates an empty index.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            forward: im::HashMap::new(),
            reverse: im::HashMap::new(),
        }
    }

    /// The relationship name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Links a member to an owner.
    ///
    /// Linking an existing edge is idempotent (no-op).
    ///
    /// # Errors
    ///
    /// Returns `BrokenInvariant` if the member already belongs to another owner.
    pub fn link(&mut self, owner: O, member: M) -> Result<()> {
        match self.reverse.get(&member) {
            Some(existing) if *existing == owner => return Ok(()),
            Some(existing) => {
                return Err(Error::broken_invariant(format!(
                    "{}: {member:?} already owned by {existing:?}",
                    self.name
                )));
            }
            None => {}
        }

        self.forward.entry(owner).or_default().insert(member);
        self.reverse.insert(member, owner);
        Ok(())
    }

    /// Removes a member from its owner, returning the previous owner.
    ///
    /// Unlinking a member with no owner is a no-op.
    pub fn unlink(&mut self, member: M) -> Option<O> {
        let owner = self.reverse.remove(&member)?;
        if let Some(members) = self.forward.get_mut(&owner) {
            members.remove(&member);
            if members.is_empty() {
                self.forward.remove(&owner);
            }
        }
        Some(owner)
    }

    /// Returns the owner of a member (reverse traversal).
    #[must_use]
    pub fn owner(&self, member: M) -> Option<O> {
        self.reverse.get(&member).copied()
    }

    /// Iterates the members of an owner (forward traversal).
    pub fn members(&self, owner: O) -> impl Iterator<Item = M> + '_ {
        self.forward
            .get(&owner)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// Number of members linked to an owner.
    #[must_use]
    pub fn member_count(&self, owner: O) -> usize {
        self.forward.get(&owner).map_or(0, im::HashSet::len)
    }

    /// Checks if a specific edge exists.
    #[must_use]
    pub fn contains(&self, owner: O, member: M) -> bool {
        self.forward
            .get(&owner)
            .is_some_and(|set| set.contains(&member))
    }

    /// Total number of edges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.reverse.len()
    }

    /// Returns true if there are no edges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reverse.is_empty()
    }

    /// Iterates all `(owner, member)` edges from the reverse side.
    pub fn edges(&self) -> impl Iterator<Item = (O, M)> + '_ {
        self.reverse.iter().map(|(member, owner)| (*owner, *member))
    }

    /// Checks that the forward and reverse indices describe the same edges.
    ///
    /// # Errors
    ///
    /// Returns `BrokenInvariant` naming the first disagreeing edge.
    pub fn verify(&self) -> Result<()> {
        let mut forward_edges = 0;
        for (owner, members) in &self.forward {
            if members.is_empty() {
                return Err(Error::broken_invariant(format!(
                    "{}: empty member set kept for {owner:?}",
                    self.name
                )));
            }
            for member in members {
                forward_edges += 1;
                if self.reverse.get(member) != Some(owner) {
                    return Err(Error::broken_invariant(format!(
                        "{}: {owner:?} lists {member:?} but its inverse is {:?}",
                        self.name,
                        self.reverse.get(member)
                    )));
                }
            }
        }
        if forward_edges != self.reverse.len() {
            return Err(Error::broken_invariant(format!(
                "{}: {} forward edges but {} inverse links",
                self.name,
                forward_edges,
                self.reverse.len()
            )));
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn corrupt_reverse(&mut self, member: M, owner: O) {
        self.reverse.insert(member, owner);
    }
}

impl<O, M> fmt::Debug for LinkIndex<O, M>
where
    O: Clone + Eq + Hash,
    M: Clone + Eq + Hash,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkIndex")
            .field("name", &self.name)
            .field("owners", &self.forward.len())
            .field("edges", &self.reverse.len())
            .finish()
    }
}
