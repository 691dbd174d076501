pub mod custom;
pub mod derive;
pub mod file;
pub mod list;
