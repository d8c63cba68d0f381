mod config;
mod serialize;

pub use config::{Config, SharedConfig};
pub use serialize::{serialize, Incomplete, TopicRecords};
