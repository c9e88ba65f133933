pub mod aggregate;
pub mod extract;
pub mod pipeline;
pub mod probe;
pub mod select;
