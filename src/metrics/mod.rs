pub mod collector;
pub mod distribution;
pub mod ewma;
pub mod percentiles;
pub mod timeweight;

pub use collector::RunCollector;
pub use distribution::{DistBucket, LatencyDistribution};
pub use ewma::ServiceTimePredictor;
pub use percentiles::ResponseTimeSummary;
pub use timeweight::{time_weighted_average, TimeWeightedAverage};
