//! Network input module

pub mod loader;

pub use loader::load_edge_list;
