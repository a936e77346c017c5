pub mod example;
pub mod feature;
pub mod span;

pub use example::RawExample;
pub use feature::Feature;
pub use span::{EntityRole, Span};
