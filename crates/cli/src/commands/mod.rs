pub mod build;
pub mod init;
pub mod preview;
pub mod render;
pub mod validate;

mod site;
