pub mod common;
pub mod fitting;
pub mod image;
pub mod tier;

pub use common::*;
pub use fitting::*;
pub use image::*;
pub use tier::*;
