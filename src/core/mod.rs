pub mod currency;
pub mod error;
pub mod period;
pub mod traits;

pub use currency::Currency;
pub use error::{AppError, Result};
pub use period::{ReportPeriod, RevenueWindow};
pub use traits::Repository;
