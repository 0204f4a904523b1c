pub mod elements;
pub mod history;
pub mod patch;
