pub mod collector;
pub mod collectors;
pub mod engine;
pub mod runner;

pub use collector::{Collector, MetricSpec, MetricValue};
pub use engine::{PollingEngine, SnmpMetricMessage};
pub use runner::MetricRunner;
