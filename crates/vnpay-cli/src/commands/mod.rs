pub mod config;
pub mod payroll;
