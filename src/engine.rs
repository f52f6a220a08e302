use crate::cmds::{Command, Operation, ReadFormat};
use crate::err::DevmemError;
use crate::mems::{PhysicalMemory, RegisterMapper};
use std::io;

/// Receives register reads for display.
pub trait ReadSink {
    fn emit(&mut self, format: ReadFormat, address: u32, value: u32) -> io::Result<()>;
}

/// Execute validated commands in order.
///
/// Set and clear are plain read-modify-write sequences; nothing else may be
/// touching the same registers while this runs.
pub fn run<M, S>(
    commands: Vec<Command>,
    mapper: &mut RegisterMapper<M>,
    sink: &mut S,
) -> Result<(), DevmemError>
where
    M: PhysicalMemory,
    S: ReadSink + ?Sized,
{
    for command in commands {
        execute(&command, mapper, sink)?;
    }
    Ok(())
}

fn execute<M, S>(
    command: &Command,
    mapper: &mut RegisterMapper<M>,
    sink: &mut S,
) -> Result<(), DevmemError>
where
    M: PhysicalMemory,
    S: ReadSink + ?Sized,
{
    let addr = command.address();
    let mut word = mapper.access(addr)?;

    let format = match command.operation() {
        Operation::ReadDecimal => ReadFormat::Decimal,
        Operation::ReadHex => ReadFormat::Hex,
        Operation::ReadBinary => ReadFormat::Binary,
        Operation::ReadVerbose => ReadFormat::Verbose,
        Operation::Write => {
            log::debug!("Write {:#010x} to {addr:#010x}", command.value());
            word.write(command.value());
            return Ok(());
        }
        Operation::SetBits => {
            let value = word.read() | command.value();
            log::debug!("Set bits {:#010x} at {addr:#010x} -> {value:#010x}", command.value());
            word.write(value);
            return Ok(());
        }
        Operation::ClearBits => {
            let value = word.read() & !command.value();
            log::debug!("Clear bits {:#010x} at {addr:#010x} -> {value:#010x}", command.value());
            word.write(value);
            return Ok(());
        }
    };

    let value = word.read();
    log::debug!("Read {value:#010x} from {addr:#010x}");
    sink.emit(format, addr, value)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mems::SimulatedMemory;

    #[derive(Default)]
    struct Recorder {
        reads: Vec<(ReadFormat, u32, u32)>,
    }

    impl ReadSink for Recorder {
        fn emit(&mut self, format: ReadFormat, address: u32, value: u32) -> io::Result<()> {
            self.reads.push((format, address, value));
            Ok(())
        }
    }

    fn setup() -> (SimulatedMemory, RegisterMapper<SimulatedMemory>) {
        let memory = SimulatedMemory::new(4096);
        let mapper = RegisterMapper::new(memory.clone());
        (memory, mapper)
    }

    #[test]
    fn test_write_then_read() {
        let (memory, mut mapper) = setup();
        let mut sink = Recorder::default();
        let commands = vec![
            Command::new(Operation::Write, 0x40, 0xFFFF_FFFF),
            Command::read(Operation::ReadHex, 0x40),
        ];

        run(commands, &mut mapper, &mut sink).unwrap();

        assert_eq!(memory.peek(0x1000_0040), 0xFFFF_FFFF);
        assert_eq!(sink.reads, vec![(ReadFormat::Hex, 0x1000_0040, 0xFFFF_FFFF)]);
    }

    #[test]
    fn test_set_and_clear_bits() {
        let (memory, mut mapper) = setup();
        memory.poke(0x1000_0d0c, 0b1001);
        let mut sink = Recorder::default();

        run(
            vec![Command::new(Operation::SetBits, 0xd0c, 0b0110)],
            &mut mapper,
            &mut sink,
        )
        .unwrap();
        assert_eq!(memory.peek(0x1000_0d0c), 0b1111);

        run(
            vec![Command::new(Operation::ClearBits, 0xd0c, 0b0011)],
            &mut mapper,
            &mut sink,
        )
        .unwrap();
        assert_eq!(memory.peek(0x1000_0d0c), 0b1100);
        assert!(sink.reads.is_empty());
    }

    #[test]
    fn test_set_then_clear_restores_value_when_mask_bits_were_clear() {
        let (memory, mut mapper) = setup();
        let mut sink = Recorder::default();

        for (original, mask) in [(0u32, 0xFFu32), (0xF0F0_0000, 0x0000_0F0F), (0x8000_0001, 0x10)] {
            memory.poke(0x1000_0100, original);
            run(
                vec![
                    Command::new(Operation::SetBits, 0x100, mask),
                    Command::new(Operation::ClearBits, 0x100, mask),
                ],
                &mut mapper,
                &mut sink,
            )
            .unwrap();
            assert_eq!(memory.peek(0x1000_0100), original);
        }
    }

    #[test]
    fn test_every_read_format_reaches_sink() {
        let (memory, mut mapper) = setup();
        memory.poke(0x1000_0000, 42);
        let mut sink = Recorder::default();
        let commands = [
            Operation::ReadDecimal,
            Operation::ReadHex,
            Operation::ReadBinary,
            Operation::ReadVerbose,
        ]
        .into_iter()
        .map(|op| Command::read(op, 0))
        .collect();

        run(commands, &mut mapper, &mut sink).unwrap();

        let formats: Vec<_> = sink.reads.iter().map(|r| r.0).collect();
        assert_eq!(
            formats,
            vec![
                ReadFormat::Decimal,
                ReadFormat::Hex,
                ReadFormat::Binary,
                ReadFormat::Verbose
            ]
        );
        assert!(sink.reads.iter().all(|r| r.2 == 42));
        assert_eq!(memory.map_count(), 1);
    }

    #[test]
    fn test_only_reads_reach_sink() {
        for opcode in ['r', 'h', 'b', 'v', 'w', 's', 'c'] {
            let operation = Operation::from_opcode(opcode).unwrap();
            let (memory, mut mapper) = setup();
            memory.poke(0x1000_0020, 0x0F);
            let mut sink = Recorder::default();

            run(
                vec![Command::new(operation, 0x20, 0xF0)],
                &mut mapper,
                &mut sink,
            )
            .unwrap();

            match operation.read_format() {
                Some(format) => {
                    assert_eq!(sink.reads, vec![(format, 0x1000_0020, 0x0F)]);
                    assert_eq!(memory.peek(0x1000_0020), 0x0F);
                }
                None => {
                    assert!(sink.reads.is_empty(), "opcode {opcode}");
                    assert_ne!(memory.peek(0x1000_0020), 0x0F, "opcode {opcode}");
                }
            }
        }
    }

    #[test]
    fn test_map_failure_stops_execution() {
        let (memory, mut mapper) = setup();
        memory.deny_page(0x1000_1000);
        let mut sink = Recorder::default();
        let commands = vec![
            Command::new(Operation::Write, 0x0, 1),
            Command::new(Operation::Write, 0x1000, 2),
            Command::new(Operation::Write, 0x4, 3),
        ];

        let err = run(commands, &mut mapper, &mut sink).unwrap_err();

        assert!(matches!(err, DevmemError::Map(_)));
        // writes before the failure stay applied
        assert_eq!(memory.peek(0x1000_0000), 1);
        assert_eq!(memory.peek(0x1000_0004), 0);
    }
}
