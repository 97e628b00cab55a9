pub mod file_loader;

pub use file_loader::{expand_paths, list_folder, load_candidate, load_candidates};
