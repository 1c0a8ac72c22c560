pub mod cli;
pub mod pipeline;

pub use pipeline::fetch_and_upload;
