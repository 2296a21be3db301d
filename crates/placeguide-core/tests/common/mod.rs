#![allow(dead_code)]

pub mod recorders;
pub mod stub_server;
