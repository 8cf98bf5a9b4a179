//! Re-run a command and keep its output in a text file.

use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
    process::{Command, ExitStatus},
};

use bon::Builder;

use crate::prelude::*;

pub const ERRORS_DELIMITER: &str = "=== ERREURS ===";

/// Lines of the capture echoed back once it is written.
pub const ECHOED_LINES: usize = 50;

#[derive(Builder)]
#[builder(finish_fn(vis = ""))]
pub struct Capture<'a> {
    program: &'a OsString,
    args: &'a [OsString],
    output: &'a Path,
}

impl<S: capture_builder::IsComplete> CaptureBuilder<'_, S> {
    pub fn run(self) -> Result<Captured> {
        self.build().run()
    }
}

#[derive(Debug)]
pub struct Captured {
    pub path: PathBuf,
    pub status: ExitStatus,
    pub text: String,
}

impl Captured {
    pub fn tail(&self, n_lines: usize) -> impl Iterator<Item = &str> {
        let lines: Vec<&str> = self.text.lines().collect();
        let skip = lines.len().saturating_sub(n_lines);
        lines.into_iter().skip(skip)
    }
}

impl Capture<'_> {
    #[instrument(skip_all, fields(program = ?self.program, output = ?self.output))]
    fn run(self) -> Result<Captured> {
        info!(args = ?self.args, "running…");
        let output = Command::new(self.program)
            .args(self.args)
            .output()
            .with_context(|| format!("failed to run `{}`", self.program.to_string_lossy()))?;
        if output.status.success() {
            info!(status = %output.status, "finished");
        } else {
            warn!(status = %output.status, "the command failed, capturing anyway");
        }

        let text = render(&String::from_utf8_lossy(&output.stdout), &String::from_utf8_lossy(&output.stderr));
        fs::write(self.output, &text)
            .with_context(|| format!("failed to write `{}`", self.output.display()))?;
        info!(n_bytes = text.len(), "captured");

        Ok(Captured { path: self.output.to_path_buf(), status: output.status, text })
    }
}

fn render(stdout: &str, stderr: &str) -> String {
    if stderr.is_empty() {
        stdout.to_owned()
    } else {
        format!("{stdout}\n\n{ERRORS_DELIMITER}\n{stderr}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str, output: &Path) -> Result<Captured> {
        let program = OsString::from("sh");
        let args = [OsString::from("-c"), OsString::from(script)];
        Capture::builder().program(&program).args(&args).output(output).run()
    }

    #[test]
    fn stdout_only() -> Result {
        let directory = tempfile::tempdir()?;
        let path = directory.path().join("capture.txt");
        let captured = sh("printf 'bonjour\\n'", &path)?;
        assert!(captured.status.success());
        assert_eq!(fs::read_to_string(&path)?, "bonjour\n");
        Ok(())
    }

    #[test]
    fn stderr_is_appended_after_the_delimiter() -> Result {
        let directory = tempfile::tempdir()?;
        let path = directory.path().join("capture.txt");
        sh("printf 'out\\n'; printf 'err\\n' >&2", &path)?;
        assert_eq!(fs::read_to_string(&path)?, "out\n\n\n=== ERREURS ===\nerr\n");
        Ok(())
    }

    #[test]
    fn failing_command_is_still_captured() -> Result {
        let directory = tempfile::tempdir()?;
        let path = directory.path().join("capture.txt");
        let captured = sh("printf 'partial'; exit 3", &path)?;
        assert_eq!(captured.status.code(), Some(3));
        assert_eq!(fs::read_to_string(&path)?, "partial");
        Ok(())
    }

    #[test]
    fn invalid_utf8_is_replaced() -> Result {
        let directory = tempfile::tempdir()?;
        let path = directory.path().join("capture.txt");
        sh("printf 'caf\\351'", &path)?;
        assert_eq!(fs::read_to_string(&path)?, "caf\u{FFFD}");
        Ok(())
    }

    #[test]
    fn missing_program_is_an_error() -> Result {
        let directory = tempfile::tempdir()?;
        let program = OsString::from("planeur-this-program-does-not-exist");
        let result =
            Capture::builder().program(&program).args(&[]).output(&directory.path().join("x")).run();
        assert!(result.is_err());
        assert!(!directory.path().join("x").exists());
        Ok(())
    }

    #[test]
    fn unwritable_output_is_an_error() -> Result {
        let directory = tempfile::tempdir()?;
        let path = directory.path().join("missing").join("capture.txt");
        assert!(sh("true", &path).is_err());
        Ok(())
    }

    #[test]
    fn tail_keeps_the_last_lines() {
        let captured = Captured {
            path: PathBuf::new(),
            status: ExitStatus::default(),
            text: (1..=60).map(|i| format!("{i}\n")).collect(),
        };
        let tail: Vec<_> = captured.tail(ECHOED_LINES).collect();
        assert_eq!(tail.len(), 50);
        assert_eq!(tail[0], "11");
        assert_eq!(tail[49], "60");
    }
}
