pub mod fetch;
pub mod probe;
