mod labels;
mod record;
mod sample;
mod selector;
mod series;
mod timestamp;

pub use labels::*;
pub use record::*;
pub use sample::*;
pub use selector::*;
pub use series::*;
pub use timestamp::*;

pub type MetricName = String;
