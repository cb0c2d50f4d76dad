//! `log` backend selection.
//!
//! In the browser records go to the developer console; natively they go
//! through `env_logger`, with `RUST_LOG` taking precedence over the level
//! passed to [`init`].

use log::LevelFilter;

/// Install the platform logger. Safe to call more than once; only the first
/// call installs anything, later calls just adjust the max level.
pub fn init(level: LevelFilter) {
    backend::install(level);
}

/// Parse a level name ("info", "debug", ...), falling back to `Info`
pub fn parse_level(name: &str) -> LevelFilter {
    name.parse().unwrap_or(LevelFilter::Info)
}

#[cfg(target_arch = "wasm32")]
mod backend {
    use log::{Level, LevelFilter, Log, Metadata, Record};
    use wasm_bindgen::JsValue;
    use web_sys::console;

    struct ConsoleLogger;

    static LOGGER: ConsoleLogger = ConsoleLogger;

    impl Log for ConsoleLogger {
        fn enabled(&self, metadata: &Metadata) -> bool {
            metadata.level() <= log::max_level()
        }

        fn log(&self, record: &Record) {
            if !self.enabled(record.metadata()) {
                return;
            }
            let line = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
            match record.level() {
                Level::Error => console::error_1(&line),
                Level::Warn => console::warn_1(&line),
                Level::Info => console::info_1(&line),
                Level::Debug | Level::Trace => console::debug_1(&line),
            }
        }

        fn flush(&self) {}
    }

    pub fn install(level: LevelFilter) {
        // Already set on a second call; the level update still applies
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(level);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod backend {
    use log::LevelFilter;

    pub fn install(level: LevelFilter) {
        let installed = env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(level.to_string()),
        )
        .try_init()
        .is_ok();
        if !installed {
            log::set_max_level(level);
        }
    }
}
