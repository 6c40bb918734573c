pub mod category;
pub mod lead;
pub mod resource;
pub mod support;
