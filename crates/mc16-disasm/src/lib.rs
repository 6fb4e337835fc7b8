pub mod model;

pub use model::{load_raw_bin, read_word, Image, Segment};
