pub mod boards;
pub mod copies;
pub mod elements;
pub mod groups;
pub mod history;
pub mod locks;
pub mod ordering;
pub mod references;
