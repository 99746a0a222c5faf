mod byte_order;
mod dtype;
mod element;

pub use byte_order::*;
pub use dtype::*;
pub use element::*;
