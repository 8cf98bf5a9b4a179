use std::{env, ffi::OsString, path::PathBuf};

use clap::Parser;

use crate::{
    capture::{Capture, ECHOED_LINES},
    prelude::*,
};

#[derive(Parser)]
pub struct CaptureArgs {
    /// Capture file.
    #[clap(long, default_value = "capture.txt", env = "PLANEUR_CAPTURE_OUTPUT")]
    output: PathBuf,

    /// Command to run, `planeur check` by default.
    #[clap(trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<OsString>,
}

impl CaptureArgs {
    #[instrument(skip_all)]
    pub fn run(self) -> Result {
        let (program, args) = match self.command.split_first() {
            Some((program, args)) => (program.clone(), args.to_vec()),
            None => {
                let program = env::current_exe().context("failed to locate the current executable")?;
                (program.into_os_string(), vec![OsString::from("check")])
            }
        };
        let captured = Capture::builder().program(&program).args(&args).output(&self.output).run()?;
        for line in captured.tail(ECHOED_LINES) {
            println!("{line}");
        }
        info!(path = %captured.path.display(), status = %captured.status, "capture saved");
        Ok(())
    }
}
