pub mod artifact;
pub mod definition;
pub mod visualizer;

pub use definition::*;
pub use visualizer::*;
