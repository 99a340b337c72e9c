pub mod matrix;
pub mod providers;
