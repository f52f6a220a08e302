use crate::config::{MAX_ARGS, REGISTER_BASE};
use crate::err::DevmemError;
use std::path::Path;

/// Program name and command tokens taken from `argv`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub tokens: Vec<String>,
}

impl Invocation {
    /// Check the argument count. `args` includes the program name.
    pub fn from_args<I>(args: I) -> Result<Self, DevmemError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let program = program_name(args.next().as_deref());
        let tokens: Vec<String> = args.collect();

        let count = tokens.len() + 1;
        if count > MAX_ARGS {
            return Err(DevmemError::TooManyArguments {
                count,
                max: MAX_ARGS,
            });
        }
        // shortest command is an opcode and an address
        if tokens.len() < 2 {
            return Err(DevmemError::Usage);
        }

        Ok(Self { program, tokens })
    }
}

/// Base name of `argv[0]`.
pub fn program_name(arg0: Option<&str>) -> String {
    arg0.and_then(|a| Path::new(a).file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string())
}

pub fn usage(program: &str) -> String {
    let n = program;
    format!(
        "
 {n} r <addr>            :read address, return decimal
 {n} h <addr>            :read address, return hex
 {n} b <addr>            :read address, return binary
 {n} v <addr>            :read address, return verbose bit table
 {n} w <addr> <val>      :write address value
 {n} s <addr> <bitmask>  :set bit(s) address bitmask
 {n} c <addr> <bitmask>  :clear bit(s) address bitmask

    <addr> absolute address or offset address from 0x{REGISTER_BASE:08x}
    <val> 32bit value
    <bitmask> 32bit bitmask value (1=set or clr specified bit)
    numbers can be in any format- decimal, hex (0x_), binary (0b_), octal (0_)
    multiple commands may follow each other, nothing is done unless all are valid

"
    )
}
