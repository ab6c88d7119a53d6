// tests/dag_graph.rs

use pkgdag::dag::BuildGraph;
use pkgdag::errors::PkgdagError;
use pkgdag::package::PackageMetadata;
use pkgdag::types::UnresolvedRequires;
use pkgdag_test_utils::{PackageBuilder, init_tracing};

fn spec_example() -> Vec<PackageMetadata> {
    vec![
        PackageBuilder::new("libfoo").provides("libfoo").build(),
        PackageBuilder::new("bar").provides("bar").requires("libfoo").build(),
        PackageBuilder::new("baz").requires("bar").build(),
    ]
}

#[test]
fn resolves_requirements_to_providers() {
    init_tracing();
    let graph = BuildGraph::build(&spec_example(), UnresolvedRequires::System).unwrap();

    assert_eq!(graph.len(), 3);
    assert_eq!(graph.dependencies_of("bar"), vec!["libfoo"]);
    assert_eq!(graph.dependencies_of("baz"), vec!["bar"]);
    assert!(graph.dependencies_of("libfoo").is_empty());
    assert_eq!(graph.dependents_of("libfoo"), vec!["bar"]);
    assert_eq!(graph.transitive_dependencies_of("baz"), vec!["libfoo", "bar"]);
    assert_eq!(graph.edge_count(), 2);
}

#[test]
fn capability_resolves_to_first_provider_in_input_order() {
    let packages = vec![
        PackageBuilder::new("openssl").provides("libssl").build(),
        PackageBuilder::new("libressl").provides("libssl").build(),
        PackageBuilder::new("curl").requires("libssl").build(),
    ];

    let graph = BuildGraph::build(&packages, UnresolvedRequires::System).unwrap();

    assert_eq!(graph.dependencies_of("curl"), vec!["openssl"]);
    assert!(graph.dependents_of("libressl").is_empty());
}

#[test]
fn package_name_counts_as_a_capability() {
    let packages = vec![
        PackageBuilder::new("zlib").build(),
        PackageBuilder::new("png").requires("zlib").build(),
    ];

    let graph = BuildGraph::build(&packages, UnresolvedRequires::System).unwrap();

    assert_eq!(graph.dependencies_of("png"), vec!["zlib"]);
}

#[test]
fn self_requirement_adds_no_edge() {
    let packages = vec![
        PackageBuilder::new("perl")
            .provides("perl(strict)")
            .requires("perl(strict)")
            .requires("perl")
            .build(),
    ];

    let graph = BuildGraph::build(&packages, UnresolvedRequires::System).unwrap();

    assert!(graph.dependencies_of("perl").is_empty());
    assert_eq!(graph.edge_count(), 0);
    assert!(graph.unresolved().is_empty());
}

#[test]
fn duplicate_requirements_on_one_provider_collapse_to_one_edge() {
    let packages = vec![
        PackageBuilder::new("qt5").provides("libQt5Core").provides("libQt5Gui").build(),
        PackageBuilder::new("app").requires("libQt5Core").requires("libQt5Gui").build(),
    ];

    let graph = BuildGraph::build(&packages, UnresolvedRequires::System).unwrap();

    assert_eq!(graph.edge_count(), 1);
    assert_eq!(graph.edges().collect::<Vec<_>>(), vec![("qt5", "app")]);
}

#[test]
fn unprovided_requirement_is_assumed_from_the_system() {
    let packages = vec![PackageBuilder::new("bar").requires("glibc").build()];

    let graph = BuildGraph::build(&packages, UnresolvedRequires::System).unwrap();

    assert!(graph.dependencies_of("bar").is_empty());
    assert_eq!(graph.unresolved().len(), 1);
    assert_eq!(graph.unresolved()[0].package, "bar");
    assert_eq!(graph.unresolved()[0].requirement, "glibc");
}

#[test]
fn unprovided_requirement_fails_under_error_policy() {
    let packages = vec![PackageBuilder::new("bar").requires("glibc").build()];

    match BuildGraph::build(&packages, UnresolvedRequires::Error) {
        Err(PkgdagError::UnresolvedRequirement {
            package,
            requirement,
        }) => {
            assert_eq!(package, "bar");
            assert_eq!(requirement, "glibc");
        }
        other => panic!("Expected UnresolvedRequirement, got: {:?}", other),
    }
}

#[test]
fn duplicate_package_names_are_rejected() {
    let packages = vec![
        PackageBuilder::new("bar").build(),
        PackageBuilder::new("bar").version("2.0").build(),
    ];

    match BuildGraph::build(&packages, UnresolvedRequires::System) {
        Err(PkgdagError::DuplicatePackage(name)) => assert_eq!(name, "bar"),
        other => panic!("Expected DuplicatePackage, got: {:?}", other),
    }
}

#[test]
fn isolated_packages_are_kept_in_input_order() {
    let packages = vec![
        PackageBuilder::new("c").build(),
        PackageBuilder::new("a").build(),
        PackageBuilder::new("b").build(),
    ];

    let graph = BuildGraph::build(&packages, UnresolvedRequires::System).unwrap();

    assert_eq!(graph.packages().collect::<Vec<_>>(), vec!["c", "a", "b"]);
    assert_eq!(graph.index_of("a"), Some(1));
    assert!(graph.contains("b"));
    assert!(!graph.contains("d"));
}
