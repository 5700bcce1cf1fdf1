//! Common utilities for the starfield visualization
//!
//! This crate provides the shared graphics setup and the viewer camera
//! used by the simulation front end.

pub mod graphics;
pub mod camera;

pub use graphics::*;
pub use camera::*;
