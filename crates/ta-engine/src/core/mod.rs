pub mod collision;
pub mod geometry;
pub mod rng;
pub mod time;
