pub mod store;
pub mod student;
pub mod validation;
