pub mod Call_Structs;
pub mod Metadata_Structs;
pub mod Status_Structs;

pub use Call_Structs::{ByteBuffer, ClientContext, RawCall, Tag}; // re-export for stable path
pub use Metadata_Structs::{MetadataArray, MetadataEntry, MetadataMap};
pub use Status_Structs::{Status, StatusCode};
