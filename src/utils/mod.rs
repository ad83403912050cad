pub mod color;
pub mod input;
pub mod url;
