pub mod annotate;
pub mod letterbox;
