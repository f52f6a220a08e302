use colored::Colorize;
use devmem::cli::{Invocation, usage};
use devmem::config::Config;
use devmem::format::Formatter;
use devmem::{DevMem, DevmemError, RegisterMapper, engine, validate};
use std::process::ExitCode;

fn run(invocation: Invocation) -> Result<(), DevmemError> {
    let config = Config::from_env()?;

    // Nothing below touches hardware until every argument checked out.
    let commands = validate(&invocation.tokens)?;

    let mut mapper = RegisterMapper::new(DevMem::new(&config)?);
    let mut formatter = Formatter::new(std::io::stdout().lock());
    engine::run(commands, &mut mapper, &mut formatter)?;
    mapper.release()?;

    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let argv: Vec<String> = std::env::args().collect();
    let program = devmem::cli::program_name(argv.first().map(String::as_str));

    let result = Invocation::from_args(argv).and_then(run);
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(DevmemError::Usage) => {
            print!("{}", usage(&program));
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
