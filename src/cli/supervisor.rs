//! Supervision of the test command.
//!
//! Each candidate is piped to a fresh run of the command in DIMACS form, and the candidate is accepted exactly when the command exits with status 0.
//! On Unix the command runs in its own process group, so a command which forks can still be interrupted as a whole when it runs past the timeout: the group is sent SIGINT, given a second to wind down, and then SIGKILL.
//!
//! Degenerate candidates --- an empty formula, or a formula containing the empty clause --- are refused without running the command, as neither is a formula a test over DIMACS input can meaningfully accept.

use std::{
    io::Write,
    process::{Child, Command, Stdio},
    time::{Duration, Instant},
};

use sat_shrink::{dimacs::clauses_to_dimacs, structures::CClause};

/// How often a running command is polled for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// How many polls a SIGINT-ed command is given before SIGKILL.
const INTERRUPT_GRACE_POLLS: u32 = 10;

/// A runner for the test command.
pub struct Supervisor {
    command: Vec<String>,
    timeout: Option<Duration>,
}

impl Supervisor {
    pub fn new(command: &str, timeout: Option<Duration>) -> Result<Self, String> {
        let command: Vec<String> = command.split_whitespace().map(String::from).collect();
        match command.is_empty() {
            true => Err("an empty test command".to_string()),
            false => Ok(Supervisor { command, timeout }),
        }
    }

    /// Whether the test command accepts the candidate.
    ///
    /// A command which cannot be spawned, exits nonzero, or times out refuses the candidate.
    pub fn accepts(&self, clauses: &[CClause]) -> bool {
        if clauses.is_empty() || clauses.iter().any(|clause| clause.is_empty()) {
            return false;
        }
        self.run(clauses).unwrap_or(false)
    }

    fn run(&self, clauses: &[CClause]) -> std::io::Result<bool> {
        let mut command = Command::new(&self.command[0]);
        command
            .args(&self.command[1..])
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        let mut child = command.spawn()?;

        // Feed stdin from a separate thread: a command which never reads must not stall the timeout.
        let payload = clauses_to_dimacs(clauses);
        let feeder = child.stdin.take().map(|mut stdin| {
            std::thread::spawn(move || {
                let _ = stdin.write_all(payload.as_bytes());
            })
        });

        let accepted = match self.timeout {
            None => child.wait()?.code() == Some(0),
            Some(limit) => {
                let started = Instant::now();
                loop {
                    if let Some(status) = child.try_wait()? {
                        break status.code() == Some(0);
                    }
                    if started.elapsed() >= limit {
                        interrupt_wait_and_kill(&mut child);
                        break false;
                    }
                    std::thread::sleep(POLL_INTERVAL);
                }
            }
        };

        if let Some(feeder) = feeder {
            let _ = feeder.join();
        }
        Ok(accepted)
    }
}

/// Interrupt the command's process group, and kill it if the interrupt is not taken.
fn interrupt_wait_and_kill(child: &mut Child) {
    if matches!(child.try_wait(), Ok(Some(_))) {
        return;
    }

    #[cfg(unix)]
    {
        signal_group(child, libc::SIGINT);
        for _ in 0..INTERRUPT_GRACE_POLLS {
            if matches!(child.try_wait(), Ok(Some(_))) {
                return;
            }
            std::thread::sleep(POLL_INTERVAL);
        }
        signal_group(child, libc::SIGKILL);
    }

    #[cfg(not(unix))]
    let _ = child.kill();

    let _ = child.wait();
}

#[cfg(unix)]
fn signal_group(child: &Child, signal: i32) {
    // The child leads its own process group, created at spawn.
    unsafe {
        libc::killpg(child.id() as i32, signal);
    }
}
