pub mod geometry;
pub mod group;
pub mod lever;
pub mod object;
pub mod sprite;
