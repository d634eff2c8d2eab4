//! # Bayes Ball
//!
//! Breadth-first search that bounces a "ball" through the network to find
//! every state conditionally dependent on a source given the observation set.
//!
//! Rules applied to each visit, in order:
//!
//! - Arrived from a child at an unobserved state, or from a parent at an
//!   observed state: pass the ball up to every parent.
//! - At an unobserved state (from either side): pass the ball down to every
//!   child.
//!
//! A directed move `(origin, destination)` is scheduled at most once per run.

use std::collections::{HashSet, VecDeque};
use std::fmt;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::acyclic::{cyclic_components, is_acyclic};
use crate::error::{NetworkError, NetworkResult};
use crate::model::{Network, StateIndex};

/// One step of the traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisitRecord {
    /// State the ball came from; `None` for the initial visit of the source.
    pub from: Option<StateIndex>,
    /// State the ball arrived at.
    pub to: StateIndex,
    /// `true` for an upward move (child to parent), `false` for a downward one.
    pub arrived_from_child: bool,
}

impl VisitRecord {
    const fn start(source: StateIndex) -> Self {
        Self {
            from: None,
            to: source,
            arrived_from_child: true,
        }
    }

    const fn upward(from: StateIndex, to: StateIndex) -> Self {
        Self {
            from: Some(from),
            to,
            arrived_from_child: true,
        }
    }

    const fn downward(from: StateIndex, to: StateIndex) -> Self {
        Self {
            from: Some(from),
            to,
            arrived_from_child: false,
        }
    }
}

impl fmt::Display for VisitRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.from {
            None => write!(f, "start -> {}", self.to),
            Some(from) if self.arrived_from_child => write!(f, "{from} -> {} (up)", self.to),
            Some(from) => write!(f, "{from} -> {} (down)", self.to),
        }
    }
}

/// Ordered result of a Bayes Ball run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Traversal {
    source: StateIndex,
    visits: Vec<VisitRecord>,
}

impl Traversal {
    #[must_use]
    pub const fn source(&self) -> StateIndex {
        self.source
    }

    /// Visit records in discovery order. The first is always the source.
    #[must_use]
    pub fn visits(&self) -> &[VisitRecord] {
        &self.visits
    }

    #[must_use]
    pub fn into_visits(self) -> Vec<VisitRecord> {
        self.visits
    }

    /// Distinct destinations in first-visit order, source included.
    #[must_use]
    pub fn reached_states(&self) -> IndexSet<StateIndex> {
        self.visits.iter().map(|visit| visit.to).collect()
    }

    #[must_use]
    pub fn reaches(&self, state: StateIndex) -> bool {
        self.visits.iter().any(|visit| visit.to == state)
    }
}

/// Run Bayes Ball from `source`.
///
/// The DAG check runs first on every call.
///
/// # Errors
///
/// - [`NetworkError::NotAcyclic`] if the network has a directed cycle; no
///   traversal is performed.
/// - [`NetworkError::StateNotFound`] if `source` is out of range or removed.
///
/// # Examples
///
/// ```
/// use bayesball_network::{Network, bayes_ball};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut network = Network::new();
/// let a = network.add_state(false);
/// let b = network.add_state(false);
/// network.add_edge(a, b);
///
/// let traversal = bayes_ball(&network, a)?;
/// assert_eq!(traversal.visits().len(), 2);
/// assert!(traversal.reaches(b));
/// # Ok(())
/// # }
/// ```
pub fn bayes_ball(network: &Network, source: StateIndex) -> NetworkResult<Traversal> {
    if !is_acyclic(network) {
        let cycles = cyclic_components(network);
        debug!(source, ?cycles, "refusing to traverse cyclic network");
        return Err(NetworkError::not_acyclic(cycles));
    }
    if !network.is_live(source) {
        return Err(NetworkError::state_not_found(source));
    }

    let mut scheduled: HashSet<(StateIndex, StateIndex)> = HashSet::new();
    let mut queue = VecDeque::from([VisitRecord::start(source)]);
    let mut visits = Vec::new();

    while let Some(visit) = queue.pop_front() {
        trace!(%visit, "visit");
        visits.push(visit);

        let Some(state) = network.state(visit.to) else {
            continue;
        };
        let observed = state.observed();

        if visit.arrived_from_child != observed {
            for parent in state.parents() {
                if scheduled.insert((visit.to, *parent)) {
                    queue.push_back(VisitRecord::upward(visit.to, *parent));
                }
            }
        }
        if !observed {
            for child in state.children() {
                if scheduled.insert((visit.to, *child)) {
                    queue.push_back(VisitRecord::downward(visit.to, *child));
                }
            }
        }
    }

    debug!(source, visits = visits.len(), "bayes ball finished");
    Ok(Traversal { source, visits })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn network(observed: &[bool], edges: &[(StateIndex, StateIndex)]) -> Network {
        let mut network = Network::new();
        for flag in observed {
            network.add_state(*flag);
        }
        for (source, target) in edges {
            network.add_edge(*source, *target);
        }
        network
    }

    #[test]
    fn test_cycle_returns_not_acyclic() {
        let network = network(&[false, false], &[(0, 1), (1, 0)]);
        let result = bayes_ball(&network, 0);
        assert_eq!(result, Err(NetworkError::not_acyclic(vec![vec![0, 1]])));
    }

    #[test]
    fn test_missing_source_returns_state_not_found() {
        let mut network = network(&[false, false], &[(0, 1)]);
        network.remove_state(1);
        assert_eq!(bayes_ball(&network, 1), Err(NetworkError::state_not_found(1)));
        assert_eq!(bayes_ball(&network, 5), Err(NetworkError::state_not_found(5)));
    }

    #[test]
    fn test_isolated_source_visits_only_itself() -> NetworkResult<()> {
        let network = network(&[false], &[]);
        let traversal = bayes_ball(&network, 0)?;
        assert_eq!(traversal.visits(), &[VisitRecord::start(0)]);
        Ok(())
    }

    #[test]
    fn test_chain_moves_downward() -> NetworkResult<()> {
        let network = network(&[false, false, false], &[(0, 1), (1, 2)]);
        let traversal = bayes_ball(&network, 0)?;
        assert_eq!(
            traversal.visits(),
            &[
                VisitRecord::start(0),
                VisitRecord::downward(0, 1),
                VisitRecord::downward(1, 2),
            ]
        );
        assert!(traversal.visits().iter().all(|v| !v.arrived_from_child || v.from.is_none()));
        Ok(())
    }

    #[test]
    fn test_observed_middle_of_chain_blocks() -> NetworkResult<()> {
        let network = network(&[false, true, false], &[(0, 1), (1, 2)]);
        let traversal = bayes_ball(&network, 0)?;
        assert_eq!(
            traversal.visits(),
            &[
                VisitRecord::start(0),
                VisitRecord::downward(0, 1),
                VisitRecord::upward(1, 0),
            ]
        );
        assert!(!traversal.reaches(2));
        Ok(())
    }

    #[test]
    fn test_observed_collider_passes_ball_up() -> NetworkResult<()> {
        let network = network(&[false, false, true], &[(0, 2), (1, 2)]);
        let traversal = bayes_ball(&network, 0)?;
        let visits = traversal.visits();
        let down = visits
            .iter()
            .position(|v| *v == VisitRecord::downward(0, 2));
        let up = visits.iter().position(|v| *v == VisitRecord::upward(2, 1));
        assert!(down.is_some() && up.is_some());
        assert!(down < up);
        assert!(traversal.reaches(1));
        Ok(())
    }

    #[test]
    fn test_unobserved_collider_blocks() -> NetworkResult<()> {
        let network = network(&[false, false, false], &[(0, 2), (1, 2)]);
        let traversal = bayes_ball(&network, 0)?;
        assert!(!traversal.reaches(1));
        Ok(())
    }

    #[test]
    fn test_common_cause_connects_siblings() -> NetworkResult<()> {
        // 1 <- 0 -> 2, starting at 1: up to 0, then down to 2.
        let network = network(&[false, false, false], &[(0, 1), (0, 2)]);
        let traversal = bayes_ball(&network, 1)?;
        assert!(traversal.visits().contains(&VisitRecord::upward(1, 0)));
        assert!(traversal.visits().contains(&VisitRecord::downward(0, 2)));
        Ok(())
    }

    #[test]
    fn test_reached_states_preserve_discovery_order() -> NetworkResult<()> {
        let network = network(&[false, false, false], &[(0, 1), (1, 2)]);
        let traversal = bayes_ball(&network, 0)?;
        let reached: Vec<_> = traversal.reached_states().into_iter().collect();
        assert_eq!(reached, vec![0, 1, 2]);
        Ok(())
    }

    #[test]
    fn test_visit_record_display() {
        assert_eq!(VisitRecord::start(3).to_string(), "start -> 3");
        assert_eq!(VisitRecord::upward(2, 1).to_string(), "2 -> 1 (up)");
        assert_eq!(VisitRecord::downward(0, 2).to_string(), "0 -> 2 (down)");
    }
}
