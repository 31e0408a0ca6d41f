#![allow(non_snake_case)]

pub mod clients;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod render;
pub mod runtime;
pub mod service;
pub mod tasks;
