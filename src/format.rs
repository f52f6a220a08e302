//! Text rendering of register reads.

use crate::cmds::ReadFormat;
use crate::engine::ReadSink;
use crate::regs::RegisterWord;
use colored::Colorize;
use std::io::{self, Write};

const GROUP_SEPARATOR: &str = "  ";

/// Writes each read to `out` in the requested format.
pub struct Formatter<W: Write> {
    out: W,
}

impl<W: Write> Formatter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReadSink for Formatter<W> {
    fn emit(&mut self, format: ReadFormat, address: u32, value: u32) -> io::Result<()> {
        let text = render(format, address, value);
        self.out.write_all(text.as_bytes())?;
        self.out.flush()
    }
}

/// Render one read, including the trailing newline.
pub fn render(format: ReadFormat, address: u32, value: u32) -> String {
    match format {
        ReadFormat::Decimal => format!("{value}\n"),
        ReadFormat::Hex => format!("0x{value:08X}\n"),
        ReadFormat::Binary => format!("0b {}\n", binary_groups(value)),
        ReadFormat::Verbose => verbose_table(address, value),
    }
}

fn binary_groups(value: u32) -> String {
    RegisterWord::from_raw(value)
        .bytes()
        .iter()
        .map(|b| format!("{b:08b}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// One table row: a label, then one cell per bit (bit 31 first) in four
/// byte groups.
fn bit_row<F>(label: &str, cell: F) -> String
where
    F: Fn(usize) -> String,
{
    let groups: Vec<String> = (0..4)
        .map(|group| {
            (0..8)
                .map(|i| cell(31 - (group * 8 + i)))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();
    let line = format!("{} {}", label.bright_cyan(), groups.join(GROUP_SEPARATOR));
    line.trim_end().to_string()
}

fn byte_row<F>(label: &str, word: RegisterWord, cell: F) -> String
where
    F: Fn(u8) -> String,
{
    let cells: Vec<String> = word.bytes().iter().map(|&b| format!("{:>15}", cell(b))).collect();
    format!("{} {}", label.bright_cyan(), cells.join(GROUP_SEPARATOR))
}

fn verbose_table(address: u32, value: u32) -> String {
    let word = RegisterWord::from_raw(value);
    let ruler = ["..............."; 4].join(GROUP_SEPARATOR);

    let lines = [
        String::new(),
        format!("addr: [0x{address:08X}] val: [0x{value:08X}]"),
        String::new(),
        bit_row("bit", |bit| match bit / 10 {
            0 => " ".to_string(),
            tens => tens.to_string(),
        }),
        bit_row("pos", |bit| (bit % 10).to_string()),
        format!("    {ruler}"),
        bit_row("bin", |bit| {
            if word.is_set(bit) {
                "1".bright_yellow().to_string()
            } else {
                "0".to_string()
            }
        }),
        byte_row("hex", word, |b| format!("0x{b:02X}")),
        byte_row("dec", word, |b| b.to_string()),
        String::new(),
    ];

    let mut table = lines.join("\n");
    table.push('\n');
    table
}
