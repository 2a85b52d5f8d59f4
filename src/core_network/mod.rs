pub mod data;
pub mod network;
pub mod port;
