// Common constants shared across modules
pub mod constants;
