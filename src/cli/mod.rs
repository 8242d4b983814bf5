pub mod quote;
pub mod search;
pub mod setup;
pub mod ui;
