pub mod error;
pub mod weekday;

pub use error::AppError;
pub use weekday::DayOfWeek;
