/*!
A command-line interface to the library.

# Use

```sh
sat_shrink [--timeout SECS] [--backup PATH] [--parallelism N] TEST_COMMAND FILE
```

`FILE` is a formula in (simplified) DIMACS CNF form which makes `TEST_COMMAND` exit with status 0 when piped to its standard input.
The file is rewritten in place with ever-smaller formulas which keep the command exiting with status 0, with the original saved beside it.

For example, to shrink a formula some solver mishandles:

```sh
sat_shrink 'my_solver --check' problem.cnf
```

Messages are written with a `c ` prefix, so anything this interface prints is a DIMACS comment.
*/

use std::path::PathBuf;

use clap::Parser;

use sat_shrink::{
    dimacs::{clauses_to_dimacs, dimacs_to_clauses},
    shrink::{ShrinkConfig, Shrinker},
};

mod supervisor;
use supervisor::Supervisor;

/// Shrink a DIMACS CNF file with respect to a test command.
#[derive(Parser)]
#[command(name = "sat_shrink", version, about)]
struct Args {
    /// Seconds after which a run of the test command is interrupted and treated as failing, with 0 for no timeout.
    #[arg(long, default_value_t = 1.0)]
    timeout: f64,

    /// File the original formula is saved to, defaulting to FILE.bak.
    #[arg(long)]
    backup: Option<PathBuf>,

    /// Worker threads used to speculate on candidates.
    #[arg(long, default_value_t = 1)]
    parallelism: usize,

    /// The test command, whitespace-split; a candidate formula is piped to its stdin in DIMACS form, and exit status 0 accepts the candidate.
    test: String,

    /// The DIMACS CNF file to shrink, rewritten in place as shrinking progresses.
    file: PathBuf,
}

/// Entrypoint to the CLI.
fn main() {
    env_logger::init();

    let args = Args::parse();
    if let Err(message) = run(args) {
        println!("c {message}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), String> {
    let contents = std::fs::read_to_string(&args.file)
        .map_err(|e| format!("unable to read {}: {e}", args.file.display()))?;
    let clauses = dimacs_to_clauses(&contents).map_err(|e| e.to_string())?;

    let backup = args.backup.unwrap_or_else(|| {
        let mut path = args.file.clone().into_os_string();
        path.push(".bak");
        PathBuf::from(path)
    });
    let _ = std::fs::remove_file(&backup);
    std::fs::write(&backup, &contents)
        .map_err(|e| format!("unable to write {}: {e}", backup.display()))?;

    let timeout = match args.timeout > 0.0 {
        true => Some(std::time::Duration::from_secs_f64(args.timeout)),
        false => None,
    };
    let supervisor = Supervisor::new(&args.test, timeout)?;

    let config = ShrinkConfig {
        parallelism: args.parallelism.max(1),
    };

    let mut shrinker = Shrinker::new(
        &clauses,
        move |candidate: &[Vec<i32>]| supervisor.accepts(candidate),
        config,
    )
    .map_err(|e| e.to_string())?;

    let target = args.file.clone();
    shrinker.on_reduce(move |shrunk| {
        let _ = std::fs::write(&target, clauses_to_dimacs(shrunk));
    });

    shrinker.reduce();
    Ok(())
}
