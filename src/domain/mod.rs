pub mod listing;
pub mod search;
