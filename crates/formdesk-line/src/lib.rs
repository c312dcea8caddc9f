pub mod client;
pub mod message;
pub mod signature;
pub mod types;
