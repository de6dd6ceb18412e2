pub mod detection;
pub mod events;
pub mod generation;
pub mod pipeline;
pub mod shared;
pub mod video;
