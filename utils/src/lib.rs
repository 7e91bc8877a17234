mod logging;
mod schema_validation;
mod time;

pub use logging::setup_logging;
pub use schema_validation::validate_credentials;
pub use time::{format_timestamp, Clock, SystemClock, TIMESTAMP_FORMAT};
