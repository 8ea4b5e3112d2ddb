pub mod alphabet;
pub mod base122;
pub mod base64;
pub mod base85;
pub mod base91;
pub mod core;
mod error;
pub mod wrap;


pub use self::alphabet::Alphabet;
pub use self::core::*;
pub use self::error::CodecError;
pub use self::wrap::LineWrapper;
