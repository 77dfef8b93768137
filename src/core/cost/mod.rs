pub mod log;

pub use log::CostLog;
