pub mod build;
pub mod serve;
pub mod validate;
