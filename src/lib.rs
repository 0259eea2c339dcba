pub mod assets;
pub mod config;
pub mod controller;
pub mod frame_loop;
pub mod game_repr;
pub mod geometry;
pub mod renderer;
