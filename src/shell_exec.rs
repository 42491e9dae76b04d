//! Command execution with logging and timing
//!
//! Every external command goes through [`Cmd`], which logs the command line
//! (with an optional context label) and a `[gs-trace]` timing line at debug
//! level:
//!
//! ```text
//! $ git status --porcelain=2 -z [status]
//! [gs-trace] ts=1234 tid=1 context=status cmd="git status --porcelain=2 -z" dur_us=4210 ok=true
//! ```

use std::io::{self, ErrorKind, Read};
use std::path::PathBuf;
use std::process::{Child, Command, Output, Stdio};
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// How often a command with a timeout is checked for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Monotonic epoch for trace timestamps.
static TRACE_EPOCH: OnceLock<Instant> = OnceLock::new();

static NEXT_THREAD_TAG: AtomicU64 = AtomicU64::new(1);

thread_local! {
    /// Small number identifying the calling thread in trace lines.
    static THREAD_TAG: u64 = NEXT_THREAD_TAG.fetch_add(1, Ordering::Relaxed);
}

fn trace_epoch() -> &'static Instant {
    TRACE_EPOCH.get_or_init(Instant::now)
}

fn thread_tag() -> u64 {
    THREAD_TAG.with(|tag| *tag)
}

/// Read a child pipe to the end on its own thread.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<Vec<u8>> {
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            // A read error leaves whatever was collected so far
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    })
}

/// Wait for `child`, killing it once `timeout` has elapsed.
///
/// Both pipes drain while waiting, so a chatty child never blocks on a full
/// pipe buffer.
fn wait_with_timeout(mut child: Child, timeout: Duration) -> io::Result<Output> {
    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());
    let deadline = Instant::now() + timeout;

    let status = loop {
        match child.try_wait()? {
            Some(status) => break status,
            None if Instant::now() >= deadline => {
                // The child may exit between try_wait and kill
                let _ = child.kill();
                child.wait()?;
                return Err(io::Error::new(
                    ErrorKind::TimedOut,
                    format!("command timed out after {}ms", timeout.as_millis()),
                ));
            }
            None => std::thread::sleep(POLL_INTERVAL),
        }
    };

    Ok(Output {
        status,
        stdout: stdout.join().unwrap_or_default(),
        stderr: stderr.join().unwrap_or_default(),
    })
}

/// Builder for executing commands with logging and an optional timeout.
///
/// ```no_run
/// use gitstate::shell_exec::Cmd;
///
/// let output = Cmd::new("git")
///     .args(["status", "--porcelain=2", "-z"])
///     .current_dir("/path/to/repo")
///     .context("status")
///     .run()?;
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Cmd {
    program: String,
    args: Vec<String>,
    current_dir: Option<PathBuf>,
    context: Option<String>,
    timeout: Option<Duration>,
    envs: Vec<(String, String)>,
}

impl Cmd {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            context: None,
            timeout: None,
            envs: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Label shown next to the command in logs.
    pub fn context(mut self, ctx: impl Into<String>) -> Self {
        self.context = Some(ctx.into());
        self
    }

    /// Kill the command if it runs longer than `duration`.
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    pub fn env(mut self, key: impl Into<String>, val: impl Into<String>) -> Self {
        self.envs.push((key.into(), val.into()));
        self
    }

    /// The command line as it appears in logs and error messages.
    pub fn command_line(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }

    /// Execute the command and return its output.
    ///
    /// A timeout surfaces as an `std::io::ErrorKind::TimedOut` error.
    pub fn run(self) -> io::Result<Output> {
        let cmd_str = self.command_line();
        match &self.context {
            Some(ctx) => log::debug!("$ {} [{}]", cmd_str, ctx),
            None => log::debug!("$ {}", cmd_str),
        }

        let t0 = Instant::now();
        let ts = t0.duration_since(*trace_epoch()).as_micros() as u64;
        let tid = thread_tag();

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(ref dir) = self.current_dir {
            cmd.current_dir(dir);
        }
        for (key, val) in &self.envs {
            cmd.env(key, val);
        }

        cmd.stdin(Stdio::null());

        let result = match self.timeout {
            Some(timeout) => cmd
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .spawn()
                .and_then(|child| wait_with_timeout(child, timeout)),
            None => cmd.output(),
        };

        let dur_us = t0.elapsed().as_micros() as u64;
        let context = self
            .context
            .as_deref()
            .map(|ctx| format!(" context={ctx}"))
            .unwrap_or_default();
        match &result {
            Ok(output) => log::debug!(
                "[gs-trace] ts={} tid={}{} cmd=\"{}\" dur_us={} ok={}",
                ts,
                tid,
                context,
                cmd_str,
                dur_us,
                output.status.success()
            ),
            Err(e) => log::debug!(
                "[gs-trace] ts={} tid={}{} cmd=\"{}\" dur_us={} err=\"{}\"",
                ts,
                tid,
                context,
                cmd_str,
                dur_us,
                e
            ),
        }

        result
    }
}
