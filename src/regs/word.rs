use bitfield::bitfield;

bitfield! {
    /// A 32-bit register value viewed as four byte lanes.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct RegisterWord(u32);

    /// Bits [31:24]
    pub u8, byte3, set_byte3: 31, 24;

    /// Bits [23:16]
    pub u8, byte2, set_byte2: 23, 16;

    /// Bits [15:8]
    pub u8, byte1, set_byte1: 15, 8;

    /// Bits [7:0]
    pub u8, byte0, set_byte0: 7, 0;
}

impl RegisterWord {
    pub const BITS: usize = 32;

    pub const fn from_raw(value: u32) -> Self {
        Self(value)
    }

    pub const fn raw(&self) -> u32 {
        self.0
    }

    /// Byte lanes, most significant first.
    pub fn bytes(&self) -> [u8; 4] {
        [self.byte3(), self.byte2(), self.byte1(), self.byte0()]
    }

    /// Bit `n` (0 = least significant).
    pub fn is_set(&self, n: usize) -> bool {
        n < Self::BITS && (self.0 >> n) & 1 == 1
    }
}

impl From<u32> for RegisterWord {
    fn from(value: u32) -> Self {
        Self(value)
    }
}
