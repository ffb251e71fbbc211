// tests/proptest_convergence.rs

//! Property-based tests for conditional activation.
//!
//! Every index `i` names an extension `e<i>` and a plain library `l<i>`
//! that depends on `z<i>`. Extensions conditionally depend on other
//! extensions and on libraries, and their conditions can name extensions or
//! the artifacts libraries only bring in transitively.
//!
//! For random graphs of that shape these verify that:
//! - activation terminates within one round per extension plus one
//! - declared extensions are never dropped and activated ones satisfy
//!   their conditions against the final runtime classpath
//! - the result is a fixed point and is deterministic

mod common;

use common::{add_extension, coords, direct, extension, key};
use curator::{
    ArtifactRepository, CatalogRepository, ConditionalDependencyEnabler, DependencyGraphResolver,
    EnabledExtensions,
};
use proptest::prelude::*;

/// Conditional dependencies and conditions of one extension, as indices
#[derive(Debug, Clone)]
struct Node {
    /// Conditional dependencies on extensions
    conditional: Vec<usize>,
    /// Conditional dependencies on plain libraries
    libraries: Vec<usize>,
    /// Conditions on extensions
    conditions: Vec<usize>,
    /// Conditions on transitive library dependencies
    transitive_conditions: Vec<usize>,
}

fn name(i: usize) -> String {
    format!("e{i}")
}

fn ext_key(i: usize) -> curator::ArtifactKey {
    key(&format!("io.acme:e{i}"))
}

fn lib_key(i: usize) -> curator::ArtifactKey {
    key(&format!("io.acme:l{i}"))
}

fn transitive_key(i: usize) -> curator::ArtifactKey {
    key(&format!("io.acme:z{i}"))
}

/// Strategy for a graph of 1..8 extensions and a non-empty base selection
fn arb_graph() -> impl Strategy<Value = (Vec<Node>, Vec<usize>)> {
    (1usize..8).prop_flat_map(|n| {
        let node = (
            prop::collection::vec(0..n, 0..3),
            prop::collection::vec(0..n, 0..3),
            prop::collection::vec(0..n, 0..3),
            prop::collection::vec(0..n, 0..3),
        )
            .prop_map(|(conditional, libraries, conditions, transitive_conditions)| Node {
                conditional,
                libraries,
                conditions,
                transitive_conditions,
            });
        (
            prop::collection::vec(node, n),
            prop::collection::btree_set(0..n, 1..=n).prop_map(|s| s.into_iter().collect()),
        )
    })
}

fn build_catalog(nodes: &[Node]) -> CatalogRepository {
    let mut catalog = CatalogRepository::new();
    for (i, node) in nodes.iter().enumerate() {
        let mut ext = extension(&name(i));
        for &target in &node.conditional {
            ext = ext.with_conditional(coords(&format!("io.acme:{}:1.0.0", name(target))));
        }
        for &library in &node.libraries {
            ext = ext.with_conditional(coords(&format!("io.acme:l{library}:1.0.0")));
        }
        for &condition in &node.conditions {
            ext = ext.with_condition(ext_key(condition));
        }
        for &condition in &node.transitive_conditions {
            ext = ext.with_condition(transitive_key(condition));
        }
        add_extension(&mut catalog, ext);
        catalog
            .insert(
                coords(&format!("io.acme:l{i}:1.0.0")),
                vec![coords(&format!("io.acme:z{i}:1.0.0"))],
            )
            .insert(coords(&format!("io.acme:z{i}:1.0.0")), vec![]);
    }
    catalog
}

fn enable(catalog: &CatalogRepository, base: &[usize]) -> EnabledExtensions {
    let base: Vec<_> = base
        .iter()
        .map(|&i| direct(&format!("io.acme:{}:1.0.0", name(i))))
        .collect();
    ConditionalDependencyEnabler::new(DependencyGraphResolver::new(catalog))
        .enable(&base)
        .unwrap()
}

fn active_keys(enabled: &EnabledExtensions) -> Vec<String> {
    enabled.extensions.iter().map(|e| e.key().to_string()).collect()
}

proptest! {
    /// Activation always converges inside the default round limit.
    #[test]
    fn activation_terminates((nodes, base) in arb_graph()) {
        let catalog = build_catalog(&nodes);
        let enabled = enable(&catalog, &base);
        prop_assert!(enabled.rounds <= catalog.extension_count() + 1);
        prop_assert!(enabled.extensions.len() <= nodes.len());
    }

    /// Declared extensions stay active and activated ones hold their conditions.
    #[test]
    fn activation_is_monotonic((nodes, base) in arb_graph()) {
        let catalog = build_catalog(&nodes);
        let enabled = enable(&catalog, &base);

        for &i in &base {
            let k = ext_key(i);
            prop_assert!(enabled.contains(&k));
            prop_assert!(enabled.resolved.contains_runtime(&k));
        }
        for activated in enabled.conditionally_activated() {
            prop_assert!(!base.iter().any(|&i| activated.key().artifact_id == name(i)));
            for condition in &activated.extension.dependency_conditions {
                prop_assert!(enabled.resolved.contains_runtime(condition));
            }
        }
    }

    /// No further conditional dependency could be activated.
    #[test]
    fn activation_reaches_fixed_point((nodes, base) in arb_graph()) {
        let catalog = build_catalog(&nodes);
        let enabled = enable(&catalog, &base);

        for active in &enabled.extensions {
            let index: usize = active.key().artifact_id[1..].parse().unwrap();
            let node = &nodes[index];
            for &library in &node.libraries {
                prop_assert!(enabled.resolved.contains_runtime(&lib_key(library)));
                prop_assert!(enabled.resolved.contains_runtime(&transitive_key(library)));
            }
            for &target in &node.conditional {
                let k = ext_key(target);
                if enabled.resolved.contains_runtime(&k) {
                    continue;
                }
                let runtime = |k: curator::ArtifactKey| enabled.resolved.contains_runtime(&k);
                let ready = nodes[target].conditions.iter().all(|&c| runtime(ext_key(c)))
                    && nodes[target]
                        .transitive_conditions
                        .iter()
                        .all(|&c| runtime(transitive_key(c)));
                prop_assert!(!ready, "{} could still activate {}", active.key(), k);
            }
        }
    }

    /// The same graph always activates in the same order.
    #[test]
    fn activation_is_deterministic((nodes, base) in arb_graph()) {
        let catalog = build_catalog(&nodes);
        let first = enable(&catalog, &base);
        let second = enable(&catalog, &base);
        prop_assert_eq!(active_keys(&first), active_keys(&second));
        prop_assert_eq!(first.rounds, second.rounds);
    }
}
