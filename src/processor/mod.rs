//! Source document readers: spreadsheets as grids, Word documents as
//! markup, and plain-text extraction across formats.

pub mod extract;
pub mod markup;
pub mod tabular;
