pub mod constants;
pub mod time;

pub use constants::*;
pub use time::{is_valid_time_cell, parse_query_date, parse_time_column};
