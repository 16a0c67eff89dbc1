//! Output sink and reference check.
//!
//! - [`json`]: write accepted records as a pretty-printed JSON array
//! - [`reference`]: compare refined records against an expected output document

pub mod json;
pub mod reference;

pub use self::json::{write_json, write_json_to_path};
pub use reference::{compare_records, compare_with_reference, ReferenceReport};
