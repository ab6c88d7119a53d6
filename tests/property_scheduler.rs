// tests/property_scheduler.rs

use std::collections::{BTreeSet, HashMap};

use proptest::prelude::*;

use pkgdag::dag::{BuildGraph, Scheduler};
use pkgdag::engine::{PassContext, plan_pass};
use pkgdag::package::{ExistingPackageRecord, ExistingRegistry, PackageMetadata};
use pkgdag::tools::Comparison;
use pkgdag::types::{Epoch, UnresolvedRequires};
use pkgdag_test_utils::{FakeComparator, PackageBuilder};

// Strategy to generate an acyclic package set.
// Package N may only require capabilities of packages 0..N-1; the list is
// then shuffled so dependencies are not always listed first.
fn package_set_strategy(max_packages: usize) -> impl Strategy<Value = Vec<PackageMetadata>> {
    (1..=max_packages).prop_flat_map(|count| {
        let deps = proptest::collection::vec(
            proptest::collection::vec(any::<usize>(), 0..4),
            count,
        );
        (deps, Just((0..count).collect::<Vec<_>>()).prop_shuffle()).prop_map(
            move |(raw_deps, order)| {
                let mut packages: Vec<PackageMetadata> = raw_deps
                    .into_iter()
                    .enumerate()
                    .map(|(i, potential)| {
                        let mut builder =
                            PackageBuilder::new(&format!("pkg{i}")).provides(&format!("cap{i}"));
                        let valid: BTreeSet<usize> = potential
                            .into_iter()
                            .filter(|_| i > 0)
                            .map(|d| d % i)
                            .collect();
                        for d in valid {
                            // Alternate between requiring by name and by capability.
                            let token = if d % 2 == 0 {
                                format!("pkg{d}")
                            } else {
                                format!("cap{d}")
                            };
                            builder = builder.requires(&token);
                        }
                        builder.requires("glibc").build()
                    })
                    .collect();
                let mut shuffled = Vec::with_capacity(packages.len());
                for idx in order {
                    shuffled.push(std::mem::replace(
                        &mut packages[idx],
                        PackageBuilder::new("placeholder").build(),
                    ));
                }
                shuffled
            },
        )
    })
}

fn context() -> PassContext {
    PassContext {
        arch: "x86_64".to_string(),
        distro: "23".to_string(),
        repository: "repository".into(),
        unresolved_requires: UnresolvedRequires::System,
    }
}

proptest! {
    #[test]
    fn every_provider_precedes_its_dependents(packages in package_set_strategy(12)) {
        let graph = BuildGraph::build(&packages, UnresolvedRequires::System).unwrap();
        let schedule = Scheduler::new(&graph).schedule().unwrap();

        prop_assert_eq!(schedule.len(), packages.len());
        let position: HashMap<&str, usize> = schedule
            .sequence()
            .iter()
            .enumerate()
            .map(|(i, n)| (n.as_str(), i))
            .collect();
        for (provider, dependent) in graph.edges() {
            prop_assert!(position[provider] < position[dependent]);
            prop_assert!(schedule.rank_of(provider) < schedule.rank_of(dependent));
        }
    }

    #[test]
    fn scheduling_is_deterministic(packages in package_set_strategy(12)) {
        let graph = BuildGraph::build(&packages, UnresolvedRequires::System).unwrap();
        let first = Scheduler::new(&graph).schedule().unwrap();

        let rebuilt = BuildGraph::build(&packages, UnresolvedRequires::System).unwrap();
        let second = Scheduler::new(&rebuilt).schedule().unwrap();

        prop_assert_eq!(first, second);
    }

    #[test]
    fn filtering_keeps_relative_order(
        packages in package_set_strategy(12),
        built in proptest::collection::vec(any::<bool>(), 12),
    ) {
        let records: Vec<ExistingPackageRecord> = packages
            .iter()
            .zip(&built)
            .filter(|(_, b)| **b)
            .map(|(p, _)| ExistingPackageRecord {
                name: p.name.clone(),
                epoch: Epoch::Unset,
                version: p.version.clone(),
                release: p.release.clone(),
            })
            .collect();
        let comparator = FakeComparator::always(Comparison::NotOlder);
        let registry = ExistingRegistry::from_records(records, &comparator).unwrap();

        let outcome = plan_pass(&packages, &registry, &comparator, &context()).unwrap();

        let kept: Vec<&str> = outcome.plan.names().collect();
        let expected: Vec<&str> = outcome
            .schedule
            .sequence()
            .iter()
            .map(String::as_str)
            .filter(|n| registry.get(n).is_none())
            .collect();
        prop_assert_eq!(&kept, &expected);
        prop_assert_eq!(outcome.steps.len(), kept.len() * 2);
        prop_assert_eq!(outcome.skipped.len(), registry.len());
    }
}
