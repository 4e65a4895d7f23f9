//! Document sources: discovery plus front-matter parsing.

mod front_matter;
mod glob_source;
mod memory;

pub use front_matter::parse_front_matter;
pub use glob_source::GlobDocumentSource;
pub use memory::MemoryDocumentSource;
