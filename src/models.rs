pub mod listing;
pub mod supplier;
