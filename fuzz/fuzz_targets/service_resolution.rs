#![no_main]

use ferrous_registry::{DiError, Lifetime, ServiceOptions, ServiceRegistry, Token};
use libfuzzer_sys::fuzz_target;

const MAX_NODES: usize = 12;

// Builds a dependency graph from the input and checks that live resolution
// and static validation agree on it.
fuzz_target!(|data: &[u8]| {
    let Some((&header, edges)) = data.split_first() else {
        return;
    };
    let nodes = (header as usize % MAX_NODES) + 1;
    let tokens: Vec<Token<u64>> = (0..nodes).map(|_| Token::new("Node")).collect();
    let registry = ServiceRegistry::new();

    // Each byte pair is (node, dependency); a few extra nodes stay unregistered
    let mut deps: Vec<Vec<usize>> = vec![Vec::new(); nodes];
    for pair in edges.chunks_exact(2).take(64) {
        deps[pair[0] as usize % nodes].push(pair[1] as usize % nodes);
    }
    let skip = edges.first().map(|b| *b as usize % (nodes + 1));

    for (i, list) in deps.iter().enumerate() {
        if Some(i) == skip {
            continue;
        }
        let lifetime = if i % 3 == 0 { Lifetime::Transient } else { Lifetime::Singleton };
        let options = ServiceOptions::new()
            .lifetime(lifetime)
            .depends_on_all(list.iter().map(|d| tokens[*d]));
        registry.register(
            &tokens[i],
            |resolved| {
                let mut total = 1u64;
                for index in 0..resolved.len() {
                    total = total.wrapping_add(*resolved.get::<u64>(index)?);
                }
                Ok(total)
            },
            options,
        );
    }

    let report = registry.validate();
    let mut all_ok = true;
    for (i, token) in tokens.iter().enumerate() {
        match registry.resolve(token) {
            Ok(_) => assert_ne!(Some(i), skip),
            Err(DiError::Circular(path)) => {
                all_ok = false;
                assert!(path.len() >= 2);
                assert_eq!(path.first(), path.last());
            }
            Err(DiError::NotFound(_)) => all_ok = false,
            Err(other) => panic!("unexpected error: {}", other),
        }
    }

    if skip.map_or(true, |s| s == nodes) {
        assert_eq!(report.is_valid(), all_ok);
    }
    registry.clear();
    assert!(registry.is_empty());
});
