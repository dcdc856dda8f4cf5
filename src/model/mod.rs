pub mod agents;
pub mod histogram;
pub mod mortality;
