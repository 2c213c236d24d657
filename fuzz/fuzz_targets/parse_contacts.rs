#![no_main]

use contrace_core::input::{graph_from_str, parse_contacts};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    match parse_contacts(text) {
        Ok(contacts) => {
            let graph = graph_from_str(text).expect("parsed once, parses again");
            assert_eq!(graph.connection_count(), contacts.len());
            for contact in &contacts {
                assert!(graph.contains(&contact.a.key));
                assert!(graph.contains(&contact.b.key));
            }
        }
        Err(err) => {
            assert!(err.line() >= 1);
            assert!(err.line() <= text.lines().count());
        }
    }
});
