pub mod portfolio;
pub mod services;
pub mod time;

pub use portfolio::Portfolio;
pub use time::{Clock, FixedClock, SystemClock};
