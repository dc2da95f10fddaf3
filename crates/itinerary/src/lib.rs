mod hashtag;
mod types;
mod viewer;

pub use hashtag::*;
pub use types::*;
pub use viewer::*;
