#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

pub mod cache;
pub mod client;
pub mod clock;
pub mod config;
pub mod coord;
pub mod dirty;
pub mod display;
pub mod event;
pub mod force;
pub mod grid;
pub mod history;
pub mod input;
pub mod movecode;
pub mod notation;
pub mod outcome;
pub mod piece;
pub mod position;
pub mod render;
pub mod test_util;
