pub mod graphml;
pub mod json;
pub mod text;
