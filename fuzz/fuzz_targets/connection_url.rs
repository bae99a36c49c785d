#![no_main]

use libfuzzer_sys::fuzz_target;
use mssql_client::{EnvironmentDefaults, PropertyResolver, PropertySet};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let resolver = PropertyResolver::standard();

    // Raw input, then the same input behind the driver prefix so the
    // segment parser is reached.
    for url in [text.to_owned(), format!("jdbc:sqlserver://{text}")] {
        let _ = resolver.resolve(&url, &PropertySet::new(), &EnvironmentDefaults::new());
        let _ = resolver.property_info(&url, &PropertySet::new());

        // A URL that parses must resolve the same way twice.
        if let Ok(Some(first)) = resolver.resolve(&url, &PropertySet::new(), &EnvironmentDefaults::new()) {
            let second = resolver
                .resolve(&url, &PropertySet::new(), &EnvironmentDefaults::new())
                .ok()
                .flatten();
            assert_eq!(Some(first), second);
        }
    }
});
