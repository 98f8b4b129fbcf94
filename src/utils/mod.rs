pub mod color;
pub mod html;
pub mod render;
