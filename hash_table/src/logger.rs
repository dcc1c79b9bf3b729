use std::sync::Once;

use env_logger::Builder;
use log::LevelFilter;

static INIT: Once = Once::new();

pub fn initialize_logger() {
    INIT.call_once_force(|_| {
        let mut builder = Builder::new();

        builder
            .filter_level(LevelFilter::Warn)
            .filter_module("hash_table", LevelFilter::Info)
            .filter_module("array", LevelFilter::Info)
            .is_test(true)
            .format_timestamp_millis()
            .parse_default_env();

        // Another test may have installed a logger already.
        let _ = builder.try_init();
    });
}
