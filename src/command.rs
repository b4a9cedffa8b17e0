use duct::cmd;
use log::trace;
use std::path::Path;
use thiserror::Error;

/// A custom error describing the error cases for external commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The command line could not be split into a program and its arguments.
    #[error("cannot parse command line {0:?}")]
    MalformedCommandLine(String),
    /// The underlying Rust command creation failed. The parameter contains the error.
    #[error("the command cannot run: {0}")]
    SpawnFailure(#[from] std::io::Error),
    /// The command returned a non-zero exit code, usually meaning it failed to start
    /// or encountered an error. The parameters are the exit code and the failed output.
    #[error("the command returned non-zero exit code {0} with output: {1}")]
    NonZeroExitcode(i32, String),
    /// The command wrote to stderr even though it exited cleanly. For queries
    /// whose output we consume this means the answer cannot be trusted.
    #[error("the command wrote to stderr: {0}")]
    StderrOutput(String),
    /// The command output contains non-UTF8 characters.
    #[error("the command returned invalid characters")]
    NonUtf8Return,
}

/// Run a `git` query whose stdout is consumed by the caller.
///
/// Any stderr output fails the query, even on a zero exit code: git only
/// talks on stderr when something is off, and a half-trusted answer would
/// feed a wrong decision downstream.
pub fn git_query(args: &[&str], dir: &Path) -> Result<String, CommandError> {
    let (stdout, stderr) = run_git(args, dir)?;

    if !stderr.trim().is_empty() {
        return Err(CommandError::StderrOutput(stderr.trim_end().to_string()));
    }

    Ok(stdout.trim().to_string())
}

/// Run a `git` command for its side effect, judged by exit code only.
///
/// Unlike [`git_query`], stderr output is tolerated: `git clone` and
/// `git fetch` report their progress on stderr even when they succeed.
pub fn git_command(args: &[&str], dir: &Path) -> Result<String, CommandError> {
    let (stdout, _) = run_git(args, dir)?;

    Ok(stdout.trim().to_string())
}

fn run_git(args: &[&str], dir: &Path) -> Result<(String, String), CommandError> {
    trace!("Running git {} in {}.", args.join(" "), dir.display());

    let output = cmd("git", args)
        .dir(dir)
        .stdout_capture()
        .stderr_capture()
        .unchecked()
        .run()?;

    let stdout = std::str::from_utf8(&output.stdout).map_err(|_| CommandError::NonUtf8Return)?;
    let stderr = std::str::from_utf8(&output.stderr).map_err(|_| CommandError::NonUtf8Return)?;

    if !output.status.success() {
        let combined = format!("{stdout}{stderr}");
        return Err(CommandError::NonZeroExitcode(
            output.status.code().unwrap_or(-1),
            combined.trim_end().to_string(),
        ));
    }

    Ok((stdout.to_string(), stderr.to_string()))
}

/// Split a shell-style command line into a program and its argument list.
///
/// Splitting is quote-aware (`shlex`), so `sh -c 'sleep 1'` keeps its last
/// argument in one piece.
pub fn parse_command_line(line: &str) -> Result<(String, Vec<String>), CommandError> {
    let mut parts =
        shlex::split(line).ok_or_else(|| CommandError::MalformedCommandLine(line.to_string()))?;

    if parts.is_empty() {
        return Err(CommandError::MalformedCommandLine(line.to_string()));
    }

    let program = parts.remove(0);
    Ok((program, parts))
}
