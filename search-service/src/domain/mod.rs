pub mod ports;
pub mod search;
