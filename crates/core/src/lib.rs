pub mod config;
pub mod error;
pub mod partition;
pub mod quote;

pub use config::Config;
pub use error::*;
pub use partition::PartitionPath;
pub use quote::*;
