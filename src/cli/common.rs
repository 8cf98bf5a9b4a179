use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
};

use clap::Parser;
use serde::Serialize;

use crate::{config::Config, prelude::*};

#[derive(Parser)]
pub struct ConfigArgs {
    /// TOML file overriding the built-in constants.
    #[clap(long = "config", env = "PLANEUR_CONFIG")]
    path: Option<PathBuf>,
}

impl ConfigArgs {
    /// Load the configuration, letting the caller adjust it before it gets validated.
    pub fn load_with(&self, adjust: impl FnOnce(&mut Config)) -> Result<Config> {
        let mut config = Config::load(self.path.as_deref())?;
        adjust(&mut config);
        config.validate().context("invalid configuration")?;
        Ok(config)
    }

    pub fn load(&self) -> Result<Config> {
        self.load_with(|_| {})
    }
}

#[derive(Parser)]
pub struct SeedArgs {
    /// Random seed, drawn from the system when omitted.
    #[clap(long, env = "PLANEUR_SEED")]
    pub seed: Option<u64>,
}

#[derive(Parser)]
pub struct LedgerArgs {
    /// Write the full ledger as JSON to this file.
    #[clap(long = "ledger", env = "PLANEUR_LEDGER")]
    path: Option<PathBuf>,
}

impl LedgerArgs {
    #[instrument(skip_all)]
    pub fn write(&self, ledger: &impl Serialize) -> Result {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let file =
            File::create(path).with_context(|| format!("failed to create `{}`", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, ledger).context("failed to serialize the ledger")?;
        writer.flush().with_context(|| format!("failed to write `{}`", path.display()))?;
        info!(path = %path.display(), "ledger written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_is_json() -> Result {
        let directory = tempfile::tempdir()?;
        let path = directory.path().join("ledger.json");
        LedgerArgs { path: Some(path.clone()) }.write(&serde_json::json!({ "days": 3 }))?;
        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
        assert_eq!(value["days"], 3);
        Ok(())
    }

    #[test]
    fn no_ledger_no_file() -> Result {
        LedgerArgs { path: None }.write(&1)?;
        Ok(())
    }

    #[test]
    fn invalid_adjustment_is_rejected() {
        let args = ConfigArgs { path: None };
        assert!(args.load_with(|config| config.budget.horizon.days = 0).is_err());
        assert!(args.load().is_ok());
    }
}
