#![allow(dead_code)]

pub mod error;
pub mod server;
