pub mod console;
pub mod docs;
pub mod filesystem;
pub mod formatters;
pub mod network;
