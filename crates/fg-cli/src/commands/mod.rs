pub mod graph;
pub mod impact;
pub mod init;
pub mod inventory;
