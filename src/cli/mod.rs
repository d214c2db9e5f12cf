pub mod history;
pub mod setup;
pub mod summary;
pub mod ui;
