//! Node kinds of the virtual tree.

mod file;
mod non_existing;

pub use file::File;
pub use non_existing::NonExistingFile;
