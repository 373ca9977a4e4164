//! docsnip — carve documentation snippets out of annotated example sources.
//!
//! Example files carry marker comments:
//!
//! ```text
//! // snippet-start: handler
//! func handler() {
//!     // cut-start: handler
//!     setupNoise()
//!     // cut-end: handler
//!     work()
//! }
//! // snippet-end: handler
//! ```
//!
//! [`extract`] returns the body of a named marker with cut regions removed and
//! shared indentation stripped. [`render::render_code_block`] wraps the result
//! in a fenced MDX code block for Docusaurus pages.

pub mod error;
pub mod extract;
pub mod manifest;
pub mod marker;
pub mod render;
pub mod scan;

pub use error::{Boundary, SnippetError};
pub use extract::extract;
