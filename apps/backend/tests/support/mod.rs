#![allow(dead_code)]

pub mod app_builder;
pub mod auth;
pub mod custody;
pub mod flows;
pub mod state;

// Logging is auto-installed for every test binary that pulls in support
#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}
