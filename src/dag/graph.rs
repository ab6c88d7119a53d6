// src/dag/graph.rs

use std::collections::{BTreeSet, HashMap};

use tracing::{debug, info};

use crate::errors::{PkgdagError, Result};
use crate::package::PackageMetadata;
use crate::types::{PackageName, UnresolvedRequires};

/// Internal node structure: stores immediate deps and dependents as indices
/// into the input package order.
#[derive(Debug, Clone)]
struct GraphNode {
    name: PackageName,
    /// Providers that must be built before this package.
    deps: BTreeSet<usize>,
    /// Packages that need this one.
    dependents: BTreeSet<usize>,
}

/// A `requires` token that no package in the pass provides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedRequirement {
    pub package: PackageName,
    pub requirement: String,
}

/// Dependency graph between the packages of one pass.
///
/// Nodes keep the input order of the package list; every node is present even
/// when it has no edges. Edges point from provider to dependent and are never
/// self-loops.
#[derive(Debug, Clone)]
pub struct BuildGraph {
    nodes: Vec<GraphNode>,
    index: HashMap<PackageName, usize>,
    unresolved: Vec<UnresolvedRequirement>,
}

impl BuildGraph {
    /// Resolve every `requires` token against the package set.
    ///
    /// A token is satisfied by the first package (in input order) that has it
    /// as its name or lists it in `provides`. Tokens resolving to the
    /// requiring package itself add nothing. Tokens with no provider are
    /// handled according to `policy`.
    pub fn build(packages: &[PackageMetadata], policy: UnresolvedRequires) -> Result<Self> {
        let mut index = HashMap::with_capacity(packages.len());
        let mut nodes = Vec::with_capacity(packages.len());

        for (i, pkg) in packages.iter().enumerate() {
            if index.insert(pkg.name.clone(), i).is_some() {
                return Err(PkgdagError::DuplicatePackage(pkg.name.clone()));
            }
            nodes.push(GraphNode {
                name: pkg.name.clone(),
                deps: BTreeSet::new(),
                dependents: BTreeSet::new(),
            });
        }

        // First writer wins, so each capability maps to its earliest provider.
        let mut providers: HashMap<&str, usize> = HashMap::new();
        for (i, pkg) in packages.iter().enumerate() {
            for cap in pkg.capabilities() {
                providers.entry(cap).or_insert(i);
            }
        }

        let mut unresolved = Vec::new();

        for (i, pkg) in packages.iter().enumerate() {
            for req in &pkg.requires {
                match providers.get(req.as_str()) {
                    Some(&p) if p == i => {
                        debug!(package = %pkg.name, requirement = %req, "requirement satisfied by the package itself");
                    }
                    Some(&p) => {
                        debug!(
                            package = %pkg.name,
                            requirement = %req,
                            provider = %packages[p].name,
                            "resolved requirement"
                        );
                        nodes[i].deps.insert(p);
                        nodes[p].dependents.insert(i);
                    }
                    None => match policy {
                        UnresolvedRequires::System => {
                            debug!(
                                package = %pkg.name,
                                requirement = %req,
                                "no provider in this pass; assuming the base system has it"
                            );
                            unresolved.push(UnresolvedRequirement {
                                package: pkg.name.clone(),
                                requirement: req.clone(),
                            });
                        }
                        UnresolvedRequires::Error => {
                            return Err(PkgdagError::UnresolvedRequirement {
                                package: pkg.name.clone(),
                                requirement: req.clone(),
                            });
                        }
                    },
                }
            }
        }

        let graph = Self {
            nodes,
            index,
            unresolved,
        };
        info!(
            packages = graph.len(),
            edges = graph.edge_count(),
            unresolved = graph.unresolved.len(),
            "dependency graph built"
        );
        Ok(graph)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Package names in input order.
    pub fn packages(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.name.as_str())
    }

    /// Position of `name` in the input order.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn name_at(&self, idx: usize) -> &str {
        &self.nodes[idx].name
    }

    pub(crate) fn dependency_indices(&self, idx: usize) -> &BTreeSet<usize> {
        &self.nodes[idx].deps
    }

    pub(crate) fn dependent_indices(&self, idx: usize) -> &BTreeSet<usize> {
        &self.nodes[idx].dependents
    }

    /// Immediate dependencies of a package, in input order.
    pub fn dependencies_of(&self, name: &str) -> Vec<&str> {
        self.resolve_names(name, |n| &n.deps)
    }

    /// Immediate dependents of a package, in input order.
    pub fn dependents_of(&self, name: &str) -> Vec<&str> {
        self.resolve_names(name, |n| &n.dependents)
    }

    /// Everything that must be built before `name`, in input order.
    pub fn transitive_dependencies_of(&self, name: &str) -> Vec<&str> {
        let Some(start) = self.index_of(name) else {
            return Vec::new();
        };

        let mut seen = BTreeSet::new();
        let mut stack: Vec<usize> = self.nodes[start].deps.iter().copied().collect();
        while let Some(idx) = stack.pop() {
            if seen.insert(idx) {
                stack.extend(self.nodes[idx].deps.iter().copied());
            }
        }
        seen.into_iter().map(|i| self.name_at(i)).collect()
    }

    /// All `(provider, dependent)` pairs.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.nodes.iter().flat_map(move |node| {
            node.dependents
                .iter()
                .map(move |&d| (node.name.as_str(), self.name_at(d)))
        })
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.deps.len()).sum()
    }

    /// Requirements dropped because nothing in the pass provides them.
    pub fn unresolved(&self) -> &[UnresolvedRequirement] {
        &self.unresolved
    }

    fn resolve_names(&self, name: &str, pick: impl Fn(&GraphNode) -> &BTreeSet<usize>) -> Vec<&str> {
        self.index_of(name)
            .map(|idx| pick(&self.nodes[idx]).iter().map(|&i| self.name_at(i)).collect())
            .unwrap_or_default()
    }
}
