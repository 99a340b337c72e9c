pub mod construction;
pub mod neighbourhood;
pub mod search;

pub use construction::*;
pub use neighbourhood::*;
pub use search::*;
