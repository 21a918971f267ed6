pub mod change_document;
pub mod job;
pub mod pagination;
pub mod project;

pub use change_document::*;
pub use job::*;
pub use pagination::*;
pub use project::*;
