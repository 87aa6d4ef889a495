mod collection;
mod dump;
mod loader;

pub use collection::*;
pub use dump::*;
pub use loader::*;
