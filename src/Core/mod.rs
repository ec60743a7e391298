pub mod builder;
pub mod call;
pub mod completion_queue;
mod debug;
pub mod futex;
pub mod loopback;
pub mod metadata;
pub mod serialization;

pub use builder::CompletionQueueBuilder;
pub use call::{Call, CallHook};
pub use completion_queue::{CompletionQueue, PluckResult};
pub use loopback::LoopbackEngine;
pub use metadata::{fill_metadata_array, fill_metadata_map};
pub use serialization::SerializationTraits;
