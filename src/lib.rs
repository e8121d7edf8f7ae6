//! rcloop - An animated series RC circuit loop.
//!
//! This crate models a battery, resistors and capacitors wired in one series
//! loop, lays their symbols out along a rectangular wire, and animates charge
//! carriers whose drift speed follows the loop current over time.

pub mod animation;
pub mod circuit;
pub mod cli;
pub mod config;
pub mod electrons;
pub mod geometry;
pub mod layout;
pub mod order;
pub mod render;
pub mod svg;
pub mod viewport;
pub mod writer;
