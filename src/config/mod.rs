pub mod job;
pub mod paths;

pub use job::{JobFile, WaitJob};
