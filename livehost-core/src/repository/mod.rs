pub mod stream;

pub use stream::{StreamRepository, StreamStore};

#[cfg(test)]
pub use stream::MockStreamStore;
