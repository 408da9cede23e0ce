#![no_main]

use libfuzzer_sys::fuzz_target;
use std::time::Duration;

use alphamath_core::{CancellationToken, DefaultProviders, ModuleId, ProviderFactory};

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }
    // First byte picks the module, the rest is the argument
    let module = ModuleId::ALL[usize::from(data[0]) % ModuleId::ALL.len()];
    let Ok(argument) = std::str::from_utf8(&data[1..]) else {
        return;
    };
    if argument.len() > 128 {
        return;
    }

    let factory = DefaultProviders::new();
    let Some(provider) = factory.get(module.as_str()) else {
        return;
    };
    let cancel = CancellationToken::with_timeout(Duration::from_millis(200));

    // Should not panic
    let _ = provider.call_main(&[argument], &cancel);
});
