use crate::config::REGISTER_BASE;

/// How a read result is rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadFormat {
    Decimal,
    Hex,
    Binary,
    Verbose,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    /// `r <addr>`
    ReadDecimal,
    /// `h <addr>`
    ReadHex,
    /// `b <addr>`
    ReadBinary,
    /// `v <addr>`
    ReadVerbose,
    /// `w <addr> <value>`
    Write,
    /// `s <addr> <bitmask>`
    SetBits,
    /// `c <addr> <bitmask>`
    ClearBits,
}

impl Operation {
    pub fn from_opcode(opcode: char) -> Option<Self> {
        match opcode {
            'r' => Some(Operation::ReadDecimal),
            'h' => Some(Operation::ReadHex),
            'b' => Some(Operation::ReadBinary),
            'v' => Some(Operation::ReadVerbose),
            'w' => Some(Operation::Write),
            's' => Some(Operation::SetBits),
            'c' => Some(Operation::ClearBits),
            _ => None,
        }
    }

    pub fn opcode(self) -> char {
        match self {
            Operation::ReadDecimal => 'r',
            Operation::ReadHex => 'h',
            Operation::ReadBinary => 'b',
            Operation::ReadVerbose => 'v',
            Operation::Write => 'w',
            Operation::SetBits => 's',
            Operation::ClearBits => 'c',
        }
    }

    /// Number of numeric operands following the opcode.
    pub fn operand_count(self) -> usize {
        match self.read_format() {
            Some(_) => 1,
            None => 2,
        }
    }

    pub fn read_format(self) -> Option<ReadFormat> {
        match self {
            Operation::ReadDecimal => Some(ReadFormat::Decimal),
            Operation::ReadHex => Some(ReadFormat::Hex),
            Operation::ReadBinary => Some(ReadFormat::Binary),
            Operation::ReadVerbose => Some(ReadFormat::Verbose),
            Operation::Write | Operation::SetBits | Operation::ClearBits => None,
        }
    }
}

/// Force an address into the register window and onto a word boundary.
///
/// Absolute (`0x10000d00`) and window-relative (`0xd00`) addresses name the
/// same register.
pub const fn normalize_address(address: u32) -> u32 {
    ((address & (REGISTER_BASE - 1)) | REGISTER_BASE) & !3
}

/// One validated operation. The address is normalized on construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Command {
    operation: Operation,
    address: u32,
    value: u32,
}

impl Command {
    pub fn read(operation: Operation, address: u32) -> Self {
        Self::new(operation, address, 0)
    }

    pub fn new(operation: Operation, address: u32, value: u32) -> Self {
        let value = match operation.read_format() {
            Some(_) => 0,
            None => value,
        };
        Self {
            operation,
            address: normalize_address(address),
            value,
        }
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn address(&self) -> u32 {
        self.address
    }

    pub fn value(&self) -> u32 {
        self.value
    }
}
