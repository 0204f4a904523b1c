pub mod elements;
pub mod history;
