//! Container format parsers.
//!
//! CZI is the only supported container. Parsing works over any
//! [`RangeReader`](crate::io::RangeReader), so a document is never loaded
//! into memory as a whole.

pub mod czi;

pub use czi::{CziReader, OpenOptions, Precedence, SubBlockInfoPolicy};
