//! CLV parameter model, boundary coercion and file loading

mod data;
pub mod coerce;
pub mod loader;

pub use data::{
    ClvParameters, MAX_TIME_HORIZON, MIN_TIME_HORIZON, NEW_PERIOD_REPEAT_PROBABILITY,
};
pub use coerce::parse_or_zero;
pub use loader::{load_parameters, load_repeat_probabilities};
