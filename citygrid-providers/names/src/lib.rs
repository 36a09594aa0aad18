//! Street-name list provider for the citygrid generator.
//!
//! Loads candidate names from JSON documents or line-based UTF-8 text.

mod errors;
mod list;

pub use errors::NameListError;
pub use list::StreetNameList;
