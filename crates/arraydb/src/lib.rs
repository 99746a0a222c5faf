#![doc = include_str!("../README.md")]

mod arrays;
mod codec;
mod compression;
mod descriptor;
mod deserializer;
mod error;
mod header;
mod hints;
mod reachable;
mod serializer;
mod storage;
mod types;
mod version;

pub use arrays::*;
pub use codec::*;
pub use compression::*;
pub use descriptor::*;
pub use deserializer::*;
pub use error::*;
pub use header::*;
use hints::*;
pub use reachable::*;
pub use serializer::*;
pub use storage::*;
pub use types::*;
pub use version::*;
