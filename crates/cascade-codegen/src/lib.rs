/// Cascade CSS generator
///
/// Turns parsed stylesheets back into CSS text, optionally minimized and
/// with px lengths rewritten to rem, and drives the file-in/CSS-out pipeline.

pub mod driver;
pub mod error;
pub mod minify;
pub mod px2rem;
pub mod stringify;

pub use driver::{ProcessOptions, ProcessOutput, Processor, Stats};
pub use error::{ProcessError, Result};
pub use px2rem::px_to_rem;
pub use stringify::{stringify, Stringifier, StringifyOptions, DEFAULT_ROOT_VALUE};
