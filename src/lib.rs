pub mod cliopt;
pub mod common;
pub mod error;
pub mod filter;
pub mod model;
pub mod pipeline;
pub mod runner;
pub mod serializer;
pub mod topic;
