pub mod calibrate;
pub mod catalog;
pub mod consts;
pub mod dataset;
pub mod error;
pub mod image;
pub mod io;
pub mod wcs;
