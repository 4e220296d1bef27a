//! Integration tests for the sidebar tree engine

mod menu_lifecycle;
mod session_flow;
mod snapshot_store;
mod support;
