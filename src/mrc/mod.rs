//! MRC2014 file format support
//!
//! Reading and writing of the volumetric image format used for cryo-EM
//! micrographs.

pub mod constants;
pub mod errors;
pub mod header;
mod image;
mod reader;
mod writer;


pub use errors::{MrcError, MrcResult};
pub use header::MrcHeader;
pub use image::MrcImage;
pub use reader::MrcReader;
pub use writer::MrcWriter;
