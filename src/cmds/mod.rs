// Command pipeline, phase one.
//
// Every argument is decoded and checked here before anything touches
// hardware; the engine only ever sees a complete, valid command list.
pub mod command;
pub mod number;
pub mod validate;

pub use command::*;
pub use number::parse_u32;
pub use validate::validate;
