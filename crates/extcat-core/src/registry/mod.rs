//! Extension catalog schema
//!
//! Raw catalog entries arrive as a JSON array (remote endpoint or pinned local
//! snapshot). This module validates that shape, turns raw entries into
//! normalized descriptors, and owns id derivation.

mod identity;
mod normalize;
mod validation;

pub use identity::*;
pub use normalize::*;
pub use validation::*;
