pub mod invalidation;
pub mod key_builder;

pub use invalidation::{InvalidationMessage, PageCache, PageInvalidationService};
pub use key_builder::{stream_keys_path, KeyBuilder};

#[cfg(test)]
pub use invalidation::MockPageCache;
