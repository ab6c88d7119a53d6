// src/dag/scheduler.rs

use std::collections::{BTreeSet, HashMap};

use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;
use tracing::{debug, info, warn};

use crate::dag::graph::BuildGraph;
use crate::errors::{CycleReport, PkgdagError, Result};
use crate::types::PackageName;

/// A complete build order for one pass.
///
/// `rank` is the length of the longest dependency chain below a package:
/// 0 for packages with no in-set dependencies. Packages of equal rank do not
/// depend on each other. The sequence itself is authoritative; ranks are
/// only a hint for pipelines that want to parallelise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    order: Vec<PackageName>,
    ranks: HashMap<PackageName, usize>,
}

impl Schedule {
    pub fn sequence(&self) -> &[PackageName] {
        &self.order
    }

    pub fn into_sequence(self) -> Vec<PackageName> {
        self.order
    }

    pub fn rank_of(&self, name: &str) -> Option<usize> {
        self.ranks.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Orders a [`BuildGraph`] so that every provider precedes its dependents.
///
/// Kahn's algorithm; whenever several packages are ready at once the one
/// that came first in the input list goes first, so the same input always
/// yields the same sequence.
#[derive(Debug)]
pub struct Scheduler<'g> {
    graph: &'g BuildGraph,
}

impl<'g> Scheduler<'g> {
    pub fn new(graph: &'g BuildGraph) -> Self {
        Self { graph }
    }

    pub fn schedule(&self) -> Result<Schedule> {
        let n = self.graph.len();
        let mut in_degree: Vec<usize> = (0..n)
            .map(|i| self.graph.dependency_indices(i).len())
            .collect();
        let mut rank = vec![0usize; n];

        let mut ready: BTreeSet<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
        let mut order = Vec::with_capacity(n);

        while let Some(idx) = ready.pop_first() {
            debug!(
                package = %self.graph.name_at(idx),
                rank = rank[idx],
                position = order.len(),
                "placing package"
            );
            order.push(idx);

            for &dep in self.graph.dependent_indices(idx) {
                rank[dep] = rank[dep].max(rank[idx] + 1);
                in_degree[dep] -= 1;
                if in_degree[dep] == 0 {
                    ready.insert(dep);
                }
            }
        }

        if order.len() < n {
            let report = self.cycle_report(&in_degree);
            warn!(%report, "cannot order packages");
            return Err(PkgdagError::Cycle(report));
        }

        let ranks = order
            .iter()
            .map(|&i| (self.graph.name_at(i).to_string(), rank[i]))
            .collect();
        let order = self.names(order);

        info!(packages = order.len(), "build order computed");
        Ok(Schedule { order, ranks })
    }

    /// Describe the packages Kahn's algorithm could not place.
    ///
    /// Every unplaced package still has a positive in-degree; the strongly
    /// connected groups among them are the cycles, the rest sit downstream.
    fn cycle_report(&self, in_degree: &[usize]) -> CycleReport {
        let stuck: BTreeSet<usize> = (0..in_degree.len())
            .filter(|&i| in_degree[i] > 0)
            .collect();

        let mut sub: DiGraphMap<usize, ()> = DiGraphMap::new();
        for &i in &stuck {
            sub.add_node(i);
        }
        for &i in &stuck {
            for &d in self.graph.dependent_indices(i) {
                if stuck.contains(&d) {
                    sub.add_edge(i, d, ());
                }
            }
        }

        let mut components: Vec<Vec<usize>> = tarjan_scc(&sub)
            .into_iter()
            .filter(|c| c.len() > 1)
            .map(|mut c| {
                c.sort_unstable();
                c
            })
            .collect();
        components.sort();

        let on_cycle: BTreeSet<usize> = components.iter().flatten().copied().collect();

        CycleReport {
            cycles: components.into_iter().map(|c| self.names(c)).collect(),
            blocked: self.names(stuck.difference(&on_cycle).copied()),
        }
    }

    fn names(&self, ids: impl IntoIterator<Item = usize>) -> Vec<PackageName> {
        ids.into_iter()
            .map(|i| self.graph.name_at(i).to_string())
            .collect()
    }
}
