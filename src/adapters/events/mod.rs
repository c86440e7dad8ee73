//! Event bus adapters.
//!
//! - `InMemoryEventBus` - In-process bus that captures and traces events

mod in_memory;

pub use in_memory::InMemoryEventBus;
