//! Language preference store implementations.

mod memory;

pub use memory::InMemoryPreferenceStore;
