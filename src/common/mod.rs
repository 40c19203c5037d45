pub mod animator;
pub mod cli;
pub mod clock;
pub mod colors;
pub mod config;
pub mod constants;
pub mod error;
pub mod renderer;
pub mod spiral;
pub mod surface;
