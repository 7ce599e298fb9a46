pub mod document_type;
pub mod library;

pub use document_type::{DocumentType, SectionSpec, CATCH_ALL_SECTION};
pub use library::{CompiledRule, PatternLibrary, StemMatcher, TermMatcher};
