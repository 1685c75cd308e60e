pub mod budget;
pub mod color;
pub mod grayscale;
pub mod pipeline;
pub mod rate;
pub mod resize;
pub mod rotate;
pub mod threshold;
