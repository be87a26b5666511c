//! Storage backends implementing the domain repository traits.

mod in_memory_repo;

pub use in_memory_repo::InMemoryParkingStore;
