//! CLI command implementations

pub(crate) mod common;
pub(crate) mod load;
pub(crate) mod regenerate;
pub(crate) mod reset_schema;
pub(crate) mod verify;
