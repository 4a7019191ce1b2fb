#![no_main]

use ferrous_registry::{ServiceOptions, ServiceRegistry, Token};
use libfuzzer_sys::fuzz_target;

const SLOTS: usize = 4;

// Replays a byte-coded sequence of registry operations and checks the
// registry against a model of the registration table.
fuzz_target!(|data: &[u8]| {
    let tokens: Vec<Token<u8>> = (0..SLOTS).map(|_| Token::new("Slot")).collect();
    let registry = ServiceRegistry::new();
    let mut model: [Option<u8>; SLOTS] = [None; SLOTS];

    for &byte in data.iter().take(256) {
        let slot = (byte as usize >> 2) % SLOTS;
        let token = &tokens[slot];
        match byte % 4 {
            0 => {
                registry.register_singleton(token, move |_| Ok(byte), ServiceOptions::new());
                model[slot] = Some(byte);
            }
            1 => {
                registry.register_transient(token, move |_| Ok(byte), ServiceOptions::new());
                model[slot] = Some(byte);
            }
            2 => {
                assert_eq!(registry.unregister(token), model[slot].is_some());
                model[slot] = None;
            }
            _ => match model[slot] {
                Some(expected) => assert_eq!(*registry.resolve(token).unwrap(), expected),
                None => assert!(registry.try_resolve(token).is_none()),
            },
        }
    }

    assert_eq!(registry.len(), model.iter().flatten().count());
    assert_eq!(registry.stats().total, registry.len());
    registry.clear();
    assert!(registry.is_empty());
});
