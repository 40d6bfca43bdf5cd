pub mod cron_field;
pub mod integer_input;

// Re-export commonly used items
pub use cron_field::{CronFieldAdapter, CronWidget, InputCronWidget};
pub use integer_input::{parse_integer, IntegerInputError};
