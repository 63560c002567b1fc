//! Model module containing data structures shared across engines

mod forecast;
mod observation;
mod utils;

pub use forecast::Forecast;
pub use observation::Observation;
pub use utils::future_timestamps;
