use atm::{analyze, Execution, Machine, MachineError, MachineLoader, ProgramManager, Step};
use clap::Parser;
use std::error::Error;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Runs a single-tape Turing machine description against one or more inputs.
#[derive(Parser)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
#[clap(after_help = "EXAMPLES:
  atm --program machines/binary-increment.atm --input 1011
  atm --program machines/ --input 1
  atm --builtin \"Unary Increment\" --input 0 --input ''
  cat machines/binary-complement.atm | atm --input 0110")]
struct Cli {
    /// The machine description file (.atm) to execute, or a directory whose `.atm` files
    /// are all executed. If omitted, the description is read from stdin when it is piped.
    #[clap(short, long, conflicts_with = "builtin")]
    program: Option<PathBuf>,

    /// Run one of the bundled machines, by name
    #[clap(short, long)]
    builtin: Option<String>,

    /// The input to the machine. Each input is run independently; defaults to an empty tape
    #[clap(short, long)]
    input: Vec<String>,

    /// Print each step of the execution
    #[clap(short = 'd', long)]
    debug: bool,

    /// Fail once this many transitions have run without halting
    #[clap(short, long)]
    max_steps: Option<usize>,

    /// Check the description for unknown states before running it
    #[clap(short, long)]
    check: bool,

    /// Print the parsed machine as JSON instead of running it
    #[clap(long)]
    json: bool,

    /// List the bundled machines
    #[clap(short, long)]
    list: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    if cli.list {
        for (i, name) in ProgramManager::list_program_names()?.iter().enumerate() {
            println!("{}: {}", i, name);
        }
        return Ok(());
    }

    match &cli.program {
        Some(path) if path.is_dir() => run_directory(cli, path),
        _ => run_machine(cli, &load_machine(cli)?, None),
    }
}

/// Runs every `.atm` file in `directory`, prefixing each output with its file path.
///
/// Files that fail to load are reported and skipped; the run fails at the end if any did.
fn run_directory(cli: &Cli, directory: &Path) -> Result<(), Box<dyn Error>> {
    let mut machines = Vec::new();
    let mut failed = 0;
    for result in MachineLoader::load_machines(directory) {
        match result {
            Ok(loaded) => machines.push(loaded),
            Err(e) => {
                eprintln!("Error: {}", e);
                failed += 1;
            }
        }
    }

    machines.sort_by(|(a, _), (b, _)| a.cmp(b));
    for (path, machine) in &machines {
        run_machine(cli, machine, Some(path))?;
    }

    if failed > 0 {
        return Err(format!("{} machine(s) in {} failed to load", failed, directory.display()).into());
    }

    Ok(())
}

fn run_machine(cli: &Cli, machine: &Machine, path: Option<&Path>) -> Result<(), Box<dyn Error>> {
    info!(
        name = %machine.name,
        states = machine.states.len(),
        "loaded machine"
    );

    if cli.check {
        analyze(machine)?;
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(machine)?);
        return Ok(());
    }

    let inputs = if cli.input.is_empty() {
        vec![String::new()]
    } else {
        cli.input.clone()
    };

    for input in &inputs {
        let output = if cli.debug {
            run_debug(machine, input, cli.max_steps)?
        } else if let Some(max_steps) = cli.max_steps {
            machine.execute_bounded(input, max_steps)?
        } else {
            machine.execute(input)?
        };

        match path {
            Some(path) => println!("{}: {}", path.display(), output),
            None => println!("{}", output),
        }
    }

    Ok(())
}

/// Loads the machine from `--builtin`, `--program`, or piped stdin, in that order.
fn load_machine(cli: &Cli) -> Result<Machine, Box<dyn Error>> {
    if let Some(name) = &cli.builtin {
        return Ok(ProgramManager::get_program_by_name(name)?);
    }

    match &cli.program {
        Some(path) => Ok(MachineLoader::load_machine(path)?),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut content = String::new();
            io::stdin().read_to_string(&mut content)?;
            Ok(MachineLoader::load_machine_from_string(&content)?)
        }
        None => Err("no machine given: use --program, --builtin, or pipe a description".into()),
    }
}

fn run_debug(
    machine: &Machine,
    input: &str,
    max_steps: Option<usize>,
) -> Result<String, MachineError> {
    let mut execution = machine.start(input);
    print_state(&execution);

    loop {
        if let Some(max) = max_steps {
            if execution.step_count() >= max && !execution.is_halted() {
                return Err(MachineError::StepLimitExceeded(max));
            }
        }

        match execution.step()? {
            Step::Continue => print_state(&execution),
            Step::Halt => break,
        }
    }

    println!("\nMachine halted.");
    Ok(execution.output())
}

fn print_state(execution: &Execution) {
    println!(
        "Step: {}, State: {}, Head: {}, Tape: [{}]",
        execution.step_count(),
        execution.state(),
        execution.head(),
        execution.tape()
    );
}
