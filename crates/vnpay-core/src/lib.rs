pub mod calculator;
pub mod config;
pub mod display;
pub mod error;
pub mod insurance;
pub mod resolver;
pub mod solver;
pub mod tax;
pub mod types;

pub use calculator::{calculate_payroll, perform_calculation};
pub use config::PayrollConfig;
pub use error::PayrollError;
pub use types::*;

/// Standard result type for all payroll operations
pub type PayrollResult<T> = Result<T, PayrollError>;
