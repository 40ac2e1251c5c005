use color_eyre::eyre::{Result, WrapErr, eyre};
use ls8_emulator::emulator::{Emulator, EmulatorConfig};
use ls8_emulator::{instruction_debug, loader};
use simple_logger::SimpleLogger;
use std::env;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Default)]
struct Options {
    program: Option<String>,
    help: bool,
    inst_dump: bool,
    mem_dump: bool,
    config: EmulatorConfig,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args: Vec<String> = env::args().collect();
    let program_name = args.first().map(String::as_str).unwrap_or("ls8-emulator");
    let options = parse_args(args.get(1..).unwrap_or_default())?;

    let level = if options.config.debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    SimpleLogger::new().with_level(level).init()?;

    if options.help {
        print_help(program_name);
        return Ok(());
    }

    if options.inst_dump {
        instruction_debug::dump_instruction_table();
        return Ok(());
    }

    let Some(path) = options.program.as_deref() else {
        eprintln!("usage: {} <program file> [options]", program_name);
        eprintln!("use --help or -h for details");
        std::process::exit(1);
    };

    let mut emulator = Emulator::new(options.config)?;
    let image = loader::load_program_file(path, emulator.config.memory_size)
        .wrap_err_with(|| format!("failed to load {}", path))?;
    emulator.cpu.load_program(&image)?;
    log::info!("loaded {} bytes from {}", image.len(), path);

    if options.mem_dump {
        instruction_debug::dump_memory(emulator.cpu.ram.as_slice());
    }

    emulator.start()?;

    log::debug!(
        "halted after {} instructions, PC = {:#04x}, FL = {:08b}",
        emulator.instruction_count,
        emulator.cpu.registers.pc,
        emulator.cpu.registers.fl
    );
    Ok(())
}

fn parse_args(args: &[String]) -> Result<Options> {
    let mut options = Options::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => options.help = true,
            "--inst-dump" | "-i" => options.inst_dump = true,
            "--mem-dump" => options.mem_dump = true,
            "--debug" | "debug" => options.config.debug = true,
            "--clock" => {
                let ms = flag_value(&mut iter, "--clock")?;
                options.config.clock_interval = Some(Duration::from_millis(ms));
            }
            "--max-instructions" => {
                let n = flag_value(&mut iter, "--max-instructions")?;
                options.config.max_instructions = if n == 0 { None } else { Some(n) };
            }
            other if other.starts_with('-') => return Err(eyre!("unknown option {}", other)),
            other => options.program = Some(other.to_string()),
        }
    }

    Ok(options)
}

fn flag_value<'a>(iter: &mut impl Iterator<Item = &'a String>, flag: &str) -> Result<u64> {
    let value = iter.next().ok_or_else(|| eyre!("{} needs a value", flag))?;
    value
        .parse()
        .wrap_err_with(|| format!("invalid value {:?} for {}", value, flag))
}

fn print_help(program_name: &str) {
    let prog_name = Path::new(program_name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("ls8-emulator");

    println!("LS-8 emulator");
    println!();
    println!("usage:");
    println!("  {} <program file> [options]   run an .ls8 listing or Intel HEX image", prog_name);
    println!("  {} --inst-dump                show the implemented instruction table", prog_name);
    println!("  {} --help                     show this help", prog_name);
    println!();
    println!("options:");
    println!("  --debug, debug                log every executed instruction");
    println!("  --clock <ms>                  tick once every <ms> milliseconds");
    println!("  --max-instructions <n>        stop after n instructions (0 = no limit)");
    println!("  --mem-dump                    print loaded memory before running");
    println!("  --inst-dump, -i               print the instruction table");
    println!("  --help, -h                    show this help");
}
