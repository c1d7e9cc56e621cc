// Library surface for headless/integration tests and reuse.
// Terminal setup and key bindings stay in main.rs.
pub mod app_dirs;
pub mod carousel;
pub mod config;
pub mod content;
pub mod effects;
pub mod error;
pub mod form;
pub mod loader;
pub mod logging;
pub mod nav;
pub mod notify;
pub mod page;
pub mod pacing;
pub mod runtime;
pub mod surface;
pub mod timer;
pub mod typing;
pub mod ui;
pub mod visibility;
