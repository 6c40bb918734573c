pub mod categories;
pub mod connection;
pub mod leads;
pub mod resources;
pub mod schema;
pub mod support;
pub mod utils;
