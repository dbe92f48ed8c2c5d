//! Helpers shared by the catalog modules.

pub mod dates;
