#![allow(dead_code)]

pub mod architecture;
pub mod files;
pub mod http_stub;
pub mod temp_db;
