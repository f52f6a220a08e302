use crate::cmds::command::{Command, Operation};
use crate::cmds::number::parse_u32;
use crate::err::ValidationError;

/// Turn the whole argument list into commands, or fail on the first bad
/// argument without producing anything.
///
/// `args` excludes the program name; reported positions are 1-based so they
/// match the argument numbers a user sees on the command line.
pub fn validate<S: AsRef<str>>(args: &[S]) -> Result<Vec<Command>, ValidationError> {
    let mut commands = Vec::new();
    let mut i = 0;

    while i < args.len() {
        let token = args[i].as_ref();
        let position = i + 1;
        let operation = decode_opcode(token, position)?;
        i += 1;

        let operand_count = operation.operand_count();
        if args.len() - i < operand_count {
            return Err(ValidationError::IncompleteCommand {
                position,
                opcode: operation.opcode(),
            });
        }

        let address = parse_operand(args, i)?;
        let value = if operand_count == 2 {
            parse_operand(args, i + 1)?
        } else {
            0
        };
        i += operand_count;

        commands.push(Command::new(operation, address, value));
    }

    log::debug!("Validated {} command(s)", commands.len());
    Ok(commands)
}

/// An opcode is one character as typed (not one byte), so a lone
/// non-ASCII character is an unknown command rather than a malformed one.
fn decode_opcode(token: &str, position: usize) -> Result<Operation, ValidationError> {
    let mut chars = token.chars();
    let opcode = match (chars.next(), chars.next()) {
        (Some(c), None) => c,
        _ => {
            return Err(ValidationError::BadOpcode {
                position,
                token: token.to_string(),
            });
        }
    };

    Operation::from_opcode(opcode).ok_or_else(|| ValidationError::UnknownOpcode {
        position,
        token: token.to_string(),
    })
}

fn parse_operand<S: AsRef<str>>(args: &[S], index: usize) -> Result<u32, ValidationError> {
    let token = args[index].as_ref();
    parse_u32(token).map_err(|e| ValidationError::invalid_operand(index + 1, token, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::REGISTER_BASE;
    use crate::err::ParseError;

    #[test]
    fn test_single_write() {
        let commands = validate(&["w", "0x10", "5"]).unwrap();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].operation(), Operation::Write);
        assert_eq!(commands[0].address(), (REGISTER_BASE | 0x10) & !3);
        assert_eq!(commands[0].value(), 5);
    }

    #[test]
    fn test_every_read_opcode() {
        for (opcode, operation) in [
            ("r", Operation::ReadDecimal),
            ("h", Operation::ReadHex),
            ("b", Operation::ReadBinary),
            ("v", Operation::ReadVerbose),
        ] {
            let commands = validate(&[opcode, "0x1235"]).unwrap();
            assert_eq!(commands, vec![Command::read(operation, 0x1234)]);
            let addr = commands[0].address();
            assert_eq!(addr & (REGISTER_BASE - 1), addr - REGISTER_BASE);
            assert_eq!(addr % 4, 0);
        }
    }

    #[test]
    fn test_batch_keeps_order() {
        let commands = validate(&[
            "w", "0xd24", "3", "s", "0xd0c", "0x80", "c", "0xd0c", "0x80", "h", "0xd28",
        ])
        .unwrap();
        let ops: Vec<_> = commands.iter().map(|c| c.operation()).collect();
        assert_eq!(
            ops,
            vec![
                Operation::Write,
                Operation::SetBits,
                Operation::ClearBits,
                Operation::ReadHex
            ]
        );
        assert_eq!(commands[1].address(), 0x1000_0d0c);
        assert_eq!(commands[1].value(), 0x80);
    }

    #[test]
    fn test_empty_input() {
        let args: [&str; 0] = [];
        assert_eq!(validate(&args), Ok(vec![]));
    }

    #[test]
    fn test_incomplete_command() {
        assert!(matches!(
            validate(&["r"]),
            Err(ValidationError::IncompleteCommand { position: 1, opcode: 'r' })
        ));
        assert!(matches!(
            validate(&["r", "4", "w", "8"]),
            Err(ValidationError::IncompleteCommand { position: 3, opcode: 'w' })
        ));
    }

    #[test]
    fn test_incomplete_command_does_not_parse_operands() {
        // the bad operand would be reported if it were inspected
        assert!(matches!(
            validate(&["s", "-1"]),
            Err(ValidationError::IncompleteCommand { .. })
        ));
    }

    #[test]
    fn test_unknown_opcode() {
        assert_eq!(
            validate(&["x", "0"]),
            Err(ValidationError::UnknownOpcode {
                position: 1,
                token: "x".to_string()
            })
        );
    }

    #[test]
    fn test_bad_opcode() {
        assert_eq!(
            validate(&["r", "0", "rw", "0"]),
            Err(ValidationError::BadOpcode {
                position: 3,
                token: "rw".to_string()
            })
        );
        assert!(matches!(
            validate(&["", "0"]),
            Err(ValidationError::BadOpcode { position: 1, .. })
        ));
    }

    #[test]
    fn test_opcode_length_counts_characters() {
        assert_eq!(
            validate(&["é", "0"]),
            Err(ValidationError::UnknownOpcode {
                position: 1,
                token: "é".to_string()
            })
        );
        assert!(matches!(
            validate(&["ré", "0"]),
            Err(ValidationError::BadOpcode { position: 1, .. })
        ));
    }

    #[test]
    fn test_invalid_operand_positions() {
        assert_eq!(
            validate(&["r", "0x10", "w", "0x20", "zz"]),
            Err(ValidationError::invalid_operand(5, "zz", ParseError::Malformed))
        );
        assert_eq!(
            validate(&["s", "-1", "1"]),
            Err(ValidationError::invalid_operand(2, "-1", ParseError::Negative))
        );
    }

    #[test]
    fn test_error_after_valid_commands_discards_everything() {
        let result = validate(&["w", "0", "1", "w", "4", "2", "q"]);
        assert!(matches!(result, Err(ValidationError::UnknownOpcode { position: 7, .. })));
    }
}
