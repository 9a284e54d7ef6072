// Library surface for the binary, headless integration tests and reuse.
pub mod app;
pub mod app_dirs;
pub mod client;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod game;
pub mod runtime;
pub mod session;
pub mod timer;
pub mod ui;
