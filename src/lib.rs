//! Canopy: page sidebar navigation tree engine
//!
//! Lazily populated children cache, ancestor path reconstruction for
//! auto-expanding to a selected page, section partitioning of the page
//! collection, optimistic drag reorder with persistence, and action menu
//! placement. A [`session::SidebarSession`] ties them together for one
//! mounted sidebar.

pub mod concurrency;
pub mod config;
pub mod error;
pub mod logging;
pub mod menu;
pub mod reorder;
pub mod resolver;
pub mod sections;
pub mod session;
pub mod source;
pub mod store;
pub mod tooling;
pub mod tree;
pub mod types;
