//! Per-document facts that surround the text pipeline: who the document is
//! about, where it lives, how it is laid out when written back, and the
//! metadata footer that marks it as processed.

pub mod metadata;
pub mod position;
pub mod render;

pub use metadata::{
    is_already_processed, parse_footer, render_footer, strip_footer, DocumentMetadata,
    FOOTER_MARKER, GENERATOR,
};
pub use position::{extract_department, extract_position, DEFAULT_DEPARTMENT, DEFAULT_POSITION};
pub use render::{render_document, strip_generated};
