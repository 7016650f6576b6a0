pub mod catalog;
pub mod header;
pub mod stamp;
pub mod stamp_writer;
