//! Bounded graph edit distance
//!
//! Unit costs: substituting a node or edge costs 0 when labels match and 1
//! otherwise; insertions and deletions cost 1. Parallel edges between one
//! ordered pair are matched as a label multiset.
//!
//! The search is a depth-first branch and bound over the nodes of the first
//! graph, each mapped to an unused node of the second graph or deleted.
//! Candidates are tried cheapest-first, so the first complete mapping is
//! usually a good one and a timed-out search still has an answer.

use crate::graph::Graph;
use crate::label;
use crate::model::NodeId;
use serde::Serialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// API-level value meaning "no edit path within the given bounds".
pub const NO_RESULT: i64 = -1;

pub const DEFAULT_UPPER_BOUND: usize = 500;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Resource limits for one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchBounds {
    /// Largest distance worth reporting.
    pub upper_bound: usize,
    /// Wall-clock budget; `None` searches to completion.
    pub timeout: Option<Duration>,
}

impl Default for SearchBounds {
    fn default() -> Self {
        Self {
            upper_bound: DEFAULT_UPPER_BOUND,
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }
}

/// A minimal-cost node mapping. `None` on the left is an insertion, on the right a deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditPath {
    pub cost: usize,
    pub node_mapping: Vec<(Option<NodeId>, Option<NodeId>)>,
}

/// Map a search result onto the `-1` sentinel convention.
pub fn to_sentinel(distance: Option<usize>) -> i64 {
    distance.map_or(NO_RESULT, |d| d as i64)
}

/// Graph reduced to positions and labels.
struct Labelled {
    ids: Vec<NodeId>,
    labels: Vec<String>,
    degree: Vec<usize>,
    pairs: HashMap<(usize, usize), Vec<String>>,
    edges: Vec<(usize, usize, String)>,
}

impl Labelled {
    fn new(graph: &Graph) -> Self {
        let ids: Vec<NodeId> = graph.all_nodes().map(|n| n.id.clone()).collect();
        let labels: Vec<String> = graph.all_nodes().map(label::node_label).collect();
        let mut degree = vec![0; ids.len()];
        let mut pairs: HashMap<(usize, usize), Vec<String>> = HashMap::new();
        let mut edges = Vec::with_capacity(graph.edge_count());
        for (src, dst, edge) in graph.positioned_edges() {
            let l = label::edge_label(edge);
            degree[src] += 1;
            degree[dst] += 1;
            pairs.entry((src, dst)).or_default().push(l.clone());
            edges.push((src, dst, l));
        }
        Self {
            ids,
            labels,
            degree,
            pairs,
            edges,
        }
    }

    fn len(&self) -> usize {
        self.ids.len()
    }

    fn pair(&self, src: usize, dst: usize) -> &[String] {
        self.pairs.get(&(src, dst)).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Cheapest way to turn one label multiset into another with unit costs.
fn multiset_distance<'s>(
    first: impl Iterator<Item = &'s str>,
    second: impl Iterator<Item = &'s str>,
) -> usize {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut first_len = 0;
    for l in first {
        *counts.entry(l).or_insert(0) += 1;
        first_len += 1;
    }
    let mut second_len = 0;
    let mut common = 0;
    for l in second {
        second_len += 1;
        if let Some(c) = counts.get_mut(l) {
            if *c > 0 {
                *c -= 1;
                common += 1;
            }
        }
    }
    first_len.max(second_len) - common
}

fn pair_cost(first: &[String], second: &[String]) -> usize {
    if first.is_empty() || second.is_empty() {
        return first.len() + second.len();
    }
    multiset_distance(
        first.iter().map(String::as_str),
        second.iter().map(String::as_str),
    )
}

struct Search<'g> {
    g1: &'g Labelled,
    g2: &'g Labelled,
    order: Vec<usize>,
    /// `None` = not processed yet, `Some(None)` = deleted, `Some(Some(v))` = mapped to v.
    image: Vec<Option<Option<usize>>>,
    used: Vec<bool>,
    /// Only mappings strictly cheaper than this are accepted.
    limit: usize,
    best: Option<(usize, Vec<Option<usize>>)>,
    deadline: Option<Instant>,
    expansions: u64,
    timed_out: bool,
}

impl<'g> Search<'g> {
    fn new(g1: &'g Labelled, g2: &'g Labelled, upper_bound: usize, deadline: Option<Instant>) -> Self {
        let mut order: Vec<usize> = (0..g1.len()).collect();
        order.sort_by(|&a, &b| g1.degree[b].cmp(&g1.degree[a]).then(a.cmp(&b)));
        Self {
            g1,
            g2,
            order,
            image: vec![None; g1.len()],
            used: vec![false; g2.len()],
            limit: upper_bound.saturating_add(1),
            best: None,
            deadline,
            expansions: 0,
            timed_out: false,
        }
    }

    fn run(mut self) -> Self {
        self.expand(0, 0);
        self
    }

    fn out_of_time(&mut self) -> bool {
        if !self.timed_out {
            if let Some(deadline) = self.deadline {
                self.timed_out = Instant::now() >= deadline;
            }
        }
        self.timed_out
    }

    fn assign(&mut self, u: usize, target: Option<usize>) {
        self.image[u] = Some(target);
        if let Some(v) = target {
            self.used[v] = true;
        }
    }

    fn unassign(&mut self, u: usize, target: Option<usize>) {
        self.image[u] = None;
        if let Some(v) = target {
            self.used[v] = false;
        }
    }

    /// Cost of mapping `u` to `target`, including edges to already processed nodes.
    fn step_cost(&self, depth: usize, u: usize, target: Option<usize>) -> usize {
        let (g1, g2) = (self.g1, self.g2);
        let mut cost = match target {
            Some(v) => usize::from(g1.labels[u] != g2.labels[v]),
            None => 1,
        };
        cost += match target {
            Some(v) => pair_cost(g1.pair(u, u), g2.pair(v, v)),
            None => g1.pair(u, u).len(),
        };
        for &w in &self.order[..depth] {
            let image_w = self.image[w].flatten();
            cost += match (target, image_w) {
                (Some(v), Some(x)) => {
                    pair_cost(g1.pair(u, w), g2.pair(v, x)) + pair_cost(g1.pair(w, u), g2.pair(x, v))
                }
                _ => g1.pair(u, w).len() + g1.pair(w, u).len(),
            };
        }
        cost
    }

    /// Admissible estimate of the cost still to come.
    fn lower_bound(&self) -> usize {
        let (g1, g2) = (self.g1, self.g2);
        let nodes = multiset_distance(
            (0..g1.len())
                .filter(|&u| self.image[u].is_none())
                .map(|u| g1.labels[u].as_str()),
            (0..g2.len())
                .filter(|&v| !self.used[v])
                .map(|v| g2.labels[v].as_str()),
        );
        let edges = multiset_distance(
            g1.edges
                .iter()
                .filter(|(s, t, _)| self.image[*s].is_none() || self.image[*t].is_none())
                .map(|(_, _, l)| l.as_str()),
            g2.edges
                .iter()
                .filter(|(s, t, _)| !self.used[*s] || !self.used[*t])
                .map(|(_, _, l)| l.as_str()),
        );
        nodes + edges
    }

    /// Cost of inserting every unused node of the second graph and the edges touching them.
    fn completion_cost(&self) -> usize {
        let inserted_nodes = self.used.iter().filter(|u| !**u).count();
        let inserted_edges = self
            .g2
            .edges
            .iter()
            .filter(|(s, t, _)| !self.used[*s] || !self.used[*t])
            .count();
        inserted_nodes + inserted_edges
    }

    fn expand(&mut self, depth: usize, cost: usize) {
        self.expansions += 1;
        if self.out_of_time() {
            return;
        }

        if depth == self.order.len() {
            let total = cost + self.completion_cost();
            if total < self.limit {
                self.limit = total;
                let mapping = self.image.iter().map(|&i| i.flatten()).collect();
                self.best = Some((total, mapping));
            }
            return;
        }

        let u = self.order[depth];
        let targets: Vec<Option<usize>> = (0..self.g2.len())
            .filter(|&v| !self.used[v])
            .map(Some)
            .chain(std::iter::once(None))
            .collect();

        let mut candidates: Vec<(usize, usize, Option<usize>)> = Vec::with_capacity(targets.len());
        for target in targets {
            if self.out_of_time() {
                return;
            }
            let step = self.step_cost(depth, u, target);
            self.assign(u, target);
            let estimate = cost + step + self.lower_bound();
            self.unassign(u, target);
            if estimate < self.limit {
                candidates.push((estimate, step, target));
            }
        }
        candidates.sort_by_key(|&(estimate, _, target)| (estimate, target.is_none(), target));

        for (estimate, step, target) in candidates {
            if estimate >= self.limit {
                continue;
            }
            self.assign(u, target);
            self.expand(depth + 1, cost + step);
            self.unassign(u, target);
            if self.timed_out {
                return;
            }
        }
    }

    fn into_path(self) -> Option<EditPath> {
        let (cost, mapping) = self.best?;
        let mut node_mapping: Vec<(Option<NodeId>, Option<NodeId>)> = mapping
            .iter()
            .enumerate()
            .map(|(u, v)| (Some(self.g1.ids[u].clone()), v.map(|v| self.g2.ids[v].clone())))
            .collect();
        let mut mapped = vec![false; self.g2.len()];
        for v in mapping.iter().flatten() {
            mapped[*v] = true;
        }
        for (v, id) in self.g2.ids.iter().enumerate() {
            if !mapped[v] {
                node_mapping.push((None, Some(id.clone())));
            }
        }
        Some(EditPath { cost, node_mapping })
    }
}

/// Exact minimal edit path with cost at most `upper_bound`, or `None`.
pub fn optimal_edit_path(first: &Graph, second: &Graph, upper_bound: usize) -> Option<EditPath> {
    let g1 = Labelled::new(first);
    let g2 = Labelled::new(second);
    let search = Search::new(&g1, &g2, upper_bound, None).run();
    tracing::debug!("Exact edit search finished after {} expansions", search.expansions);
    search.into_path()
}

/// Exact edit distance bounded by `upper_bound`; [`NO_RESULT`] if none exists within it.
pub fn optimal_edit_paths(first: &Graph, second: &Graph, upper_bound: usize) -> i64 {
    to_sentinel(optimal_edit_path(first, second, upper_bound).map(|p| p.cost))
}

/// Anytime edit distance search.
///
/// Returns the best distance found within `bounds.upper_bound`. When the
/// timeout fires first, the best distance found so far is returned, or
/// `None` if the search had not completed any mapping yet.
pub fn search_edit_distance(first: &Graph, second: &Graph, bounds: &SearchBounds) -> Option<usize> {
    let g1 = Labelled::new(first);
    let g2 = Labelled::new(second);
    // a timeout too large to represent means no deadline
    let deadline = bounds.timeout.and_then(|t| Instant::now().checked_add(t));
    let search = Search::new(&g1, &g2, bounds.upper_bound, deadline).run();

    if search.timed_out {
        tracing::warn!(
            "Edit distance search timed out after {} expansions (best so far: {:?})",
            search.expansions,
            search.best.as_ref().map(|(c, _)| *c)
        );
    } else {
        tracing::info!(
            "Edit distance search completed after {} expansions: {:?}",
            search.expansions,
            search.best.as_ref().map(|(c, _)| *c)
        );
    }
    search.best.map(|(cost, _)| cost)
}

/// [`search_edit_distance`] with the `-1` sentinel for "no result".
pub fn edit_distance(first: &Graph, second: &Graph, bounds: &SearchBounds) -> i64 {
    to_sentinel(search_edit_distance(first, second, bounds))
}
