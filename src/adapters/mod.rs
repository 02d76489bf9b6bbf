//! Adapters implementing domain ports.
//!
//! Infrastructure implementations of the traits defined in [`crate::ports`]:
//! input sources for headless runs and storage back-ends for the learned
//! table. The headless game world lives in [`crate::game`].

pub mod in_memory_repository;
pub mod input;
pub mod msgpack_repository;

pub use in_memory_repository::InMemoryRepository;
pub use input::{NoInput, ScriptedInput};
pub use msgpack_repository::MsgPackRepository;
