pub mod categories;
pub mod leads;
pub mod resources;
pub mod support;
