pub mod integrate;
pub mod survey;
pub mod sweep;
