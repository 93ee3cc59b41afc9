pub mod analysis;
pub mod application;
