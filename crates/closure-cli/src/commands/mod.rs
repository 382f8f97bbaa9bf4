pub mod check;
pub mod find;
pub mod stats;
