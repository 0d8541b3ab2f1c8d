pub mod configuration;
pub use configuration::Configuration;

pub mod error_handling;

pub mod model;
pub use model::{Post, PostId};

pub mod storage;

pub mod web_interface;
