pub mod boards;
pub mod elements;
pub mod groups;
pub mod history;
pub mod media;
