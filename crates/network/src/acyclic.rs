//! DAG validation.
//!
//! [`is_acyclic`] is a depth-first search with an explicit stack, so graph
//! depth is bounded by heap rather than call-stack size. Each state carries one
//! of three marks; meeting a state that is still on the current path means a
//! back edge, and the search stops there.
//!
//! [`cyclic_components`] answers the follow-up question of *which* states are
//! involved, using petgraph's Tarjan SCC.

use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;
use tracing::trace;

use crate::model::{Network, StateIndex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnPath,
    Finished,
}

/// A state on the DFS stack and the position of the next child to explore.
#[derive(Debug, Clone, Copy)]
struct Frame {
    state: StateIndex,
    next_child: usize,
}

/// Returns `true` when the live states of `network` form a DAG.
///
/// Tombstones contribute nothing. Nothing is cached: every call walks the
/// current edge set.
///
/// # Examples
///
/// ```
/// use bayesball_network::{Network, is_acyclic};
///
/// let mut network = Network::new();
/// let a = network.add_state(false);
/// let b = network.add_state(false);
/// network.add_edge(a, b);
/// assert!(is_acyclic(&network));
/// network.add_edge(b, a);
/// assert!(!is_acyclic(&network));
/// ```
#[must_use]
pub fn is_acyclic(network: &Network) -> bool {
    let mut marks = vec![Mark::Unvisited; network.number_of_states()];

    for root in network.live_states() {
        if mark_of(&marks, root) != Mark::Unvisited {
            continue;
        }
        if !search_from(network, root, &mut marks) {
            trace!(root, "back edge found");
            return false;
        }
    }
    true
}

/// DFS from `root`. Returns `false` as soon as a back edge is seen.
fn search_from(network: &Network, root: StateIndex, marks: &mut [Mark]) -> bool {
    set_mark(marks, root, Mark::OnPath);
    let mut stack = vec![Frame {
        state: root,
        next_child: 0,
    }];

    while let Some(frame) = stack.last_mut() {
        let child = network
            .children(frame.state)
            .and_then(|children| children.get_index(frame.next_child))
            .copied();

        let Some(child) = child else {
            set_mark(marks, frame.state, Mark::Finished);
            stack.pop();
            continue;
        };
        frame.next_child = frame.next_child.saturating_add(1);

        match mark_of(marks, child) {
            Mark::OnPath => return false,
            Mark::Finished => {}
            Mark::Unvisited => {
                set_mark(marks, child, Mark::OnPath);
                stack.push(Frame {
                    state: child,
                    next_child: 0,
                });
            }
        }
    }
    true
}

fn mark_of(marks: &[Mark], index: StateIndex) -> Mark {
    marks.get(index).copied().unwrap_or(Mark::Finished)
}

fn set_mark(marks: &mut [Mark], index: StateIndex, mark: Mark) {
    if let Some(slot) = marks.get_mut(index) {
        *slot = mark;
    }
}

/// Strongly connected components with more than one state, each sorted
/// ascending, ordered by their smallest member. Empty iff the network is a DAG.
#[must_use]
pub fn cyclic_components(network: &Network) -> Vec<Vec<StateIndex>> {
    let mut graph: DiGraphMap<StateIndex, ()> = DiGraphMap::new();
    for state in network.live_states() {
        graph.add_node(state);
    }
    for (source, target) in network.edges() {
        graph.add_edge(source, target, ());
    }

    let mut components: Vec<Vec<StateIndex>> = tarjan_scc(&graph)
        .into_iter()
        .filter(|component| component.len() > 1)
        .map(|mut component| {
            component.sort_unstable();
            component
        })
        .collect();
    components.sort();
    components
}
