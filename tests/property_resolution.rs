/// Property-based tests for service resolution
///
/// Random dependency graphs are registered and the live resolution path is
/// checked against the static validation pass.

use ferrous_registry::{DiError, ServiceOptions, ServiceRegistry, Token};
use proptest::prelude::*;
use std::sync::Arc;

const NAMES: [&str; 8] = ["N0", "N1", "N2", "N3", "N4", "N5", "N6", "N7"];

/// Registers `edges[i]` as the dependency list of node `i`.
///
/// Each node's value is its index plus the sum of its dependencies' values.
fn build(edges: &[Vec<usize>], transient: bool) -> (ServiceRegistry, Vec<Token<u64>>) {
    let tokens: Vec<Token<u64>> = NAMES[..edges.len()].iter().map(|n| Token::new(*n)).collect();
    let registry = ServiceRegistry::new();

    for (i, deps) in edges.iter().enumerate() {
        let options = ServiceOptions::new().depends_on_all(deps.iter().map(|d| tokens[*d]));
        let options = if transient { options.lifetime(ferrous_registry::Lifetime::Transient) } else { options };
        let base = i as u64;
        registry.register(
            &tokens[i],
            move |resolved| {
                let mut total = base;
                for index in 0..resolved.len() {
                    total = total.wrapping_add(*resolved.get::<u64>(index)?);
                }
                Ok(total)
            },
            options,
        );
    }
    (registry, tokens)
}

fn expected_value(edges: &[Vec<usize>], node: usize) -> u64 {
    edges[node]
        .iter()
        .fold(node as u64, |acc, dep| acc.wrapping_add(expected_value(edges, *dep)))
}

fn arb_dag() -> impl Strategy<Value = Vec<Vec<usize>>> {
    (1usize..=NAMES.len()).prop_flat_map(|n| {
        (0..n)
            .map(|i| {
                if i == 0 {
                    Just(Vec::new()).boxed()
                } else {
                    prop::collection::vec(0..i, 0..3).boxed()
                }
            })
            .collect::<Vec<_>>()
    })
}

fn arb_graph() -> impl Strategy<Value = Vec<Vec<usize>>> {
    (1usize..=NAMES.len()).prop_flat_map(|n| prop::collection::vec(prop::collection::vec(0..n, 0..3), n))
}

proptest! {
    #[test]
    fn acyclic_graphs_validate_and_resolve(edges in arb_dag(), transient in any::<bool>()) {
        let (registry, tokens) = build(&edges, transient);

        prop_assert!(registry.validate().is_valid());
        for (i, token) in tokens.iter().enumerate() {
            let value = registry.resolve(token).unwrap();
            prop_assert_eq!(*value, expected_value(&edges, i));
        }
    }
}

proptest! {
    #[test]
    fn validation_agrees_with_resolution(edges in arb_graph()) {
        let (registry, tokens) = build(&edges, false);

        let report = registry.validate();
        let all_resolve = tokens.iter().all(|t| registry.resolve(t).is_ok());
        prop_assert_eq!(report.is_valid(), all_resolve);

        // Every reported cycle follows real edges and closes on its start
        for cycle in report.cycles() {
            prop_assert!(cycle.len() >= 2);
            prop_assert_eq!(cycle.first(), cycle.last());
            for pair in cycle.windows(2) {
                let from = NAMES.iter().position(|n| *n == pair[0].name()).unwrap();
                prop_assert!(edges[from].iter().any(|d| pair[1] == tokens[*d]));
            }
        }
    }
}

proptest! {
    #[test]
    fn resolution_errors_are_well_formed_cycles(edges in arb_graph()) {
        let (registry, tokens) = build(&edges, true);

        for token in &tokens {
            match registry.resolve(token) {
                Ok(_) => {}
                Err(DiError::Circular(path)) => {
                    prop_assert!(path.len() >= 2);
                    prop_assert_eq!(path.first(), path.last());
                    for pair in path.windows(2) {
                        let from = NAMES.iter().position(|n| *n == pair[0]).unwrap();
                        let to = NAMES.iter().position(|n| *n == pair[1]).unwrap();
                        prop_assert!(edges[from].contains(&to));
                    }
                }
                Err(other) => prop_assert!(false, "unexpected error: {}", other),
            }
        }
    }
}

proptest! {
    #[test]
    fn singleton_resolution_consistency(value in "\\PC{0,50}") {
        let token: Token<String> = Token::new("Value");
        let registry = ServiceRegistry::new();
        let captured = value.clone();
        registry.register_singleton(&token, move |_| Ok(captured.clone()), ServiceOptions::new());

        let first = registry.resolve(&token).unwrap();
        let second = registry.resolve(&token).unwrap();

        prop_assert!(Arc::ptr_eq(&first, &second));
        prop_assert_eq!(&*first, &value);
    }
}

proptest! {
    #[test]
    fn optional_resolution_matches_registration(register in any::<bool>()) {
        let token: Token<u64> = Token::new("Maybe");
        let registry = ServiceRegistry::new();
        if register {
            registry.register_instance(&token, 42u64);
        }

        prop_assert_eq!(registry.try_resolve(&token).is_some(), register);
        prop_assert_eq!(registry.is_registered(&token), register);
    }
}
