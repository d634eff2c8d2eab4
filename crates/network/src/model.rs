//! # Network model
//!
//! The structure of a Bayesian network: states (random variables), directed
//! edges between them, and the per-state observation flag.
//!
//! States live in a growth-only arena. Removing a state leaves a vacant slot
//! behind so every other index stays valid, and freed indices are never handed
//! out again by the same model.

use indexmap::IndexSet;
use tracing::debug;

/// Stable index of a state within a [`Network`].
pub type StateIndex = usize;

/// Ordered adjacency set. Iteration follows insertion order.
pub type Adjacency = IndexSet<StateIndex>;

/// A live state and its incident edges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateRecord {
    observed: bool,
    parents: Adjacency,
    children: Adjacency,
}

impl StateRecord {
    fn new(observed: bool) -> Self {
        Self {
            observed,
            ..Self::default()
        }
    }

    /// Whether the state is part of the observation set.
    #[must_use]
    pub const fn observed(&self) -> bool {
        self.observed
    }

    /// Sources of incoming edges, in insertion order.
    #[must_use]
    pub const fn parents(&self) -> &Adjacency {
        &self.parents
    }

    /// Targets of outgoing edges, in insertion order.
    #[must_use]
    pub const fn children(&self) -> &Adjacency {
        &self.children
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Slot {
    Vacant,
    Live(StateRecord),
}

/// Bayesian-network structure.
///
/// Every structural edit is total: a reference to an out-of-range or removed
/// state makes the edit a no-op, and the return value says whether anything
/// changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Network {
    slots: Vec<Slot>,
}

impl Network {
    /// Create an empty network.
    ///
    /// # Examples
    ///
    /// ```
    /// use bayesball_network::Network;
    ///
    /// let network = Network::new();
    /// assert_eq!(network.number_of_states(), 0);
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Append a new state and return its index.
    ///
    /// # Examples
    ///
    /// ```
    /// use bayesball_network::Network;
    ///
    /// let mut network = Network::new();
    /// assert_eq!(network.add_state(false), 0);
    /// assert_eq!(network.add_state(true), 1);
    /// assert_eq!(network.is_observed(1), Some(true));
    /// ```
    pub fn add_state(&mut self, observed: bool) -> StateIndex {
        let index = self.slots.len();
        self.slots.push(Slot::Live(StateRecord::new(observed)));
        debug!(index, observed, "added state");
        index
    }

    /// Reserve an index without creating a live state.
    pub(crate) fn push_vacant(&mut self) {
        self.slots.push(Slot::Vacant);
    }

    /// Remove a state, severing every incident edge first.
    ///
    /// The slot is kept as a tombstone, so `number_of_states` does not change.
    /// Returns `false` when `index` is out of range or already removed.
    pub fn remove_state(&mut self, index: StateIndex) -> bool {
        let Some(slot) = self.slots.get_mut(index) else {
            return false;
        };
        let Slot::Live(record) = std::mem::replace(slot, Slot::Vacant) else {
            return false;
        };

        for parent in &record.parents {
            if let Some(parent_record) = self.record_mut(*parent) {
                parent_record.children.shift_remove(&index);
            }
        }
        for child in &record.children {
            if let Some(child_record) = self.record_mut(*child) {
                child_record.parents.shift_remove(&index);
            }
        }

        debug!(
            index,
            parents = record.parents.len(),
            children = record.children.len(),
            "removed state"
        );
        true
    }

    /// Add the edge `source -> target`.
    ///
    /// No-op unless both endpoints are live, distinct, and not already
    /// connected in this direction. Returns whether the edge was inserted.
    ///
    /// # Examples
    ///
    /// ```
    /// use bayesball_network::Network;
    ///
    /// let mut network = Network::new();
    /// let a = network.add_state(false);
    /// let b = network.add_state(false);
    /// assert!(network.add_edge(a, b));
    /// assert!(!network.add_edge(a, b));
    /// assert_eq!(network.edge_count(), 1);
    /// ```
    pub fn add_edge(&mut self, source: StateIndex, target: StateIndex) -> bool {
        if source == target || !self.is_live(source) || !self.is_live(target) {
            return false;
        }

        let inserted = self
            .record_mut(source)
            .is_some_and(|record| record.children.insert(target));
        if inserted {
            if let Some(record) = self.record_mut(target) {
                record.parents.insert(source);
            }
            debug!(source, target, "added edge");
        }
        inserted
    }

    /// Remove the edge `source -> target`. Returns whether it existed.
    pub fn remove_edge(&mut self, source: StateIndex, target: StateIndex) -> bool {
        let removed = self
            .record_mut(source)
            .is_some_and(|record| record.children.shift_remove(&target));
        if removed {
            if let Some(record) = self.record_mut(target) {
                record.parents.shift_remove(&source);
            }
            debug!(source, target, "removed edge");
        }
        removed
    }

    /// Replace `source -> target` with `target -> source`.
    ///
    /// No-op when the edge does not exist. When `target -> source` is already
    /// present, the pair collapses into that single edge.
    pub fn reverse_edge(&mut self, source: StateIndex, target: StateIndex) -> bool {
        if !self.remove_edge(source, target) {
            return false;
        }
        self.add_edge(target, source);
        true
    }

    /// Flip the observation flag of a live state and return the new value.
    pub fn toggle_observed(&mut self, index: StateIndex) -> Option<bool> {
        let record = self.record_mut(index)?;
        record.observed = !record.observed;
        debug!(index, observed = record.observed, "toggled observation");
        Some(record.observed)
    }

    /// Size of the address space, tombstones included.
    #[must_use]
    pub fn number_of_states(&self) -> usize {
        self.slots.len()
    }

    /// Number of live states.
    #[must_use]
    pub fn live_state_count(&self) -> usize {
        self.live_states().count()
    }

    /// Number of directed edges between live states.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.records().map(|(_, record)| record.children.len()).sum()
    }

    /// One entry per index: `None` for a tombstone, otherwise the observed flag.
    #[must_use]
    pub fn observation_vector(&self) -> Vec<Option<bool>> {
        self.slots
            .iter()
            .map(|slot| match slot {
                Slot::Vacant => None,
                Slot::Live(record) => Some(record.observed),
            })
            .collect()
    }

    /// The live state at `index`, if any.
    #[must_use]
    pub fn state(&self, index: StateIndex) -> Option<&StateRecord> {
        match self.slots.get(index) {
            Some(Slot::Live(record)) => Some(record),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_live(&self, index: StateIndex) -> bool {
        self.state(index).is_some()
    }

    #[must_use]
    pub fn is_observed(&self, index: StateIndex) -> Option<bool> {
        self.state(index).map(StateRecord::observed)
    }

    /// Children of a live state; `None` for tombstones and out-of-range indices.
    #[must_use]
    pub fn children(&self, index: StateIndex) -> Option<&Adjacency> {
        self.state(index).map(StateRecord::children)
    }

    /// Parents of a live state; `None` for tombstones and out-of-range indices.
    #[must_use]
    pub fn parents(&self, index: StateIndex) -> Option<&Adjacency> {
        self.state(index).map(StateRecord::parents)
    }

    /// Indices of live states in ascending order.
    pub fn live_states(&self) -> impl Iterator<Item = StateIndex> + '_ {
        self.records().map(|(index, _)| index)
    }

    /// All edges as `(source, target)`, ordered by source then insertion.
    pub fn edges(&self) -> impl Iterator<Item = (StateIndex, StateIndex)> + '_ {
        self.records().flat_map(|(source, record)| {
            record.children.iter().map(move |target| (source, *target))
        })
    }

    fn records(&self) -> impl Iterator<Item = (StateIndex, &StateRecord)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| match slot {
                Slot::Live(record) => Some((index, record)),
                Slot::Vacant => None,
            })
    }

    fn record_mut(&mut self, index: StateIndex) -> Option<&mut StateRecord> {
        match self.slots.get_mut(index) {
            Some(Slot::Live(record)) => Some(record),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(len: usize) -> Network {
        let mut network = Network::new();
        let states: Vec<StateIndex> = (0..len).map(|_| network.add_state(false)).collect();
        for pair in states.windows(2) {
            if let [from, to] = pair {
                network.add_edge(*from, *to);
            }
        }
        network
    }

    fn children_of(network: &Network, index: StateIndex) -> Option<Vec<StateIndex>> {
        network
            .children(index)
            .map(|set| set.iter().copied().collect())
    }

    fn parents_of(network: &Network, index: StateIndex) -> Option<Vec<StateIndex>> {
        network
            .parents(index)
            .map(|set| set.iter().copied().collect())
    }

    #[test]
    fn test_new_network_is_empty() {
        let network = Network::new();
        assert_eq!(network.number_of_states(), 0);
        assert_eq!(network.edge_count(), 0);
        assert!(network.observation_vector().is_empty());
    }

    #[test]
    fn test_add_state_assigns_sequential_indices() {
        let mut network = Network::new();
        assert_eq!(network.add_state(false), 0);
        assert_eq!(network.add_state(true), 1);
        assert_eq!(network.observation_vector(), vec![Some(false), Some(true)]);
    }

    #[test]
    fn test_add_edge_is_symmetric() {
        let network = chain(2);
        assert_eq!(children_of(&network, 0), Some(vec![1]));
        assert_eq!(parents_of(&network, 1), Some(vec![0]));
        assert_eq!(parents_of(&network, 0), Some(vec![]));
    }

    #[test]
    fn test_add_edge_rejects_duplicates_and_self_loops() {
        let mut network = chain(2);
        assert!(!network.add_edge(0, 1));
        assert!(!network.add_edge(1, 1));
        assert_eq!(network.edge_count(), 1);
        assert_eq!(parents_of(&network, 1), Some(vec![0]));
    }

    #[test]
    fn test_add_edge_with_missing_endpoint_is_noop() {
        let mut network = chain(2);
        assert!(!network.add_edge(0, 7));
        assert!(!network.add_edge(7, 0));
        network.remove_state(1);
        assert!(!network.add_edge(0, 1));
        assert_eq!(network.edge_count(), 0);
    }

    #[test]
    fn test_remove_edge_twice_matches_once() {
        let mut once = chain(3);
        assert!(once.remove_edge(0, 1));

        let mut twice = chain(3);
        twice.remove_edge(0, 1);
        assert!(!twice.remove_edge(0, 1));

        assert_eq!(once, twice);
    }

    #[test]
    fn test_remove_state_severs_edges_and_keeps_address_space() {
        let mut network = chain(3);
        network.add_edge(0, 2);

        assert!(network.remove_state(1));

        assert_eq!(network.number_of_states(), 3);
        assert_eq!(network.observation_vector(), vec![Some(false), None, Some(false)]);
        assert_eq!(children_of(&network, 0), Some(vec![2]));
        assert_eq!(parents_of(&network, 2), Some(vec![0]));
        assert!(network.children(1).is_none());
        assert!(network.edges().all(|(s, t)| s != 1 && t != 1));
    }

    #[test]
    fn test_remove_state_is_noop_for_tombstone_and_out_of_range() {
        let mut network = chain(2);
        assert!(network.remove_state(0));
        let snapshot = network.clone();
        assert!(!network.remove_state(0));
        assert!(!network.remove_state(9));
        assert_eq!(network, snapshot);
    }

    #[test]
    fn test_indices_are_not_reused_after_removal() {
        let mut network = chain(2);
        network.remove_state(1);
        assert_eq!(network.add_state(false), 2);
        assert!(!network.is_live(1));
    }

    #[test]
    fn test_toggle_observed() {
        let mut network = chain(1);
        assert_eq!(network.toggle_observed(0), Some(true));
        assert_eq!(network.toggle_observed(0), Some(false));
        assert_eq!(network.toggle_observed(3), None);
    }

    #[test]
    fn test_reverse_edge() {
        let mut network = chain(2);
        assert!(network.reverse_edge(0, 1));
        assert_eq!(children_of(&network, 1), Some(vec![0]));
        assert_eq!(children_of(&network, 0), Some(vec![]));
        assert!(!network.reverse_edge(0, 1));
    }

    #[test]
    fn test_reverse_edge_on_two_cycle_leaves_single_edge() {
        let mut network = chain(2);
        network.add_edge(1, 0);

        assert!(network.reverse_edge(0, 1));

        assert_eq!(network.edges().collect::<Vec<_>>(), vec![(1, 0)]);
        assert_eq!(parents_of(&network, 0), Some(vec![1]));
        assert_eq!(parents_of(&network, 1), Some(vec![]));
    }

    #[test]
    fn test_edges_are_ordered_by_source_then_insertion() {
        let mut network = chain(3);
        network.add_edge(2, 0);
        network.add_edge(0, 2);
        let edges: Vec<_> = network.edges().collect();
        assert_eq!(edges, vec![(0, 1), (0, 2), (1, 2), (2, 0)]);
    }
}
