//! Content model and the pure transformations over it.

pub mod aggregate;
pub mod family;
pub mod language;
pub mod model;
pub mod normalize;
pub mod validate;
