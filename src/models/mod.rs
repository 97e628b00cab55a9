pub mod candidate;
pub mod item;
pub mod loaders;

pub use candidate::{document_type_label, file_extension, Candidate, ContentClass, Payload};
pub use item::{BatchCounters, ExtractionResult, Item, ItemError, ItemId, ItemStatus, ResultSource};
pub use loaders::{expand_paths, load_candidates};
