mod error;
mod model;
mod normalize;
mod timestamp;


pub use error::NormalizeError;
pub use model::{RawRecord, Reading, ReadingSet};
pub use normalize::normalize;
