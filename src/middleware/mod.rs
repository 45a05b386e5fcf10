pub mod extract;
pub mod failures;
