pub mod cli;
pub mod cmds;
pub mod config;
pub mod engine;
pub mod err;
pub mod format;
pub mod mems;
pub mod regs;

pub use cmds::*;
pub use err::*;
pub use mems::*;
pub use regs::*;
