pub(crate) mod af;
pub(crate) mod prefix_id;

pub use prefix_id::PrefixId;

pub mod errors;
pub mod roa;
pub mod stats;
