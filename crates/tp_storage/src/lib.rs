pub mod backends;

pub use backends::*;

pub mod prelude {
    pub use super::backends::*;
    pub use tp_core::{RecordStore, Result, VideoRecord};
}
