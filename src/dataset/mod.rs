pub mod loader;
pub mod types;

pub use loader::{infer_cell, load_dataset, read_dataset, Dataset, DatasetError, DEFAULT_INPUT_FILE};
pub use types::Entity;
