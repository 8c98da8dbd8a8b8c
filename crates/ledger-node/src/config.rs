use crate::constants::{DEFAULT_ENV_FILE, DEFAULT_LISTEN};
use clap::{Parser, ValueEnum};
use ledger_core::{ChainConfig, ForkChoice, PowPolicy};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "ledger-node")]
#[command(about = "HTTP node serving a proof-of-work ledger")]
pub struct Args {
    /// Address to listen on, e.g. 127.0.0.1:8080
    #[arg(long, env = "SERVER_ADDR", default_value = DEFAULT_LISTEN)]
    pub listen: String,

    /// File of KEY=VALUE pairs loaded into the environment at startup
    #[arg(long, default_value = DEFAULT_ENV_FILE)]
    pub env_file: PathBuf,

    /// Whether appended blocks must prove their work
    #[arg(long, value_enum, env = "LEDGER_POW_POLICY", default_value_t = PowPolicyArg::Verifying)]
    pub pow_policy: PowPolicyArg,

    /// Rule for adopting a competing chain
    #[arg(long, value_enum, env = "LEDGER_FORK_CHOICE", default_value_t = ForkChoiceArg::LongestChain)]
    pub fork_choice: ForkChoiceArg,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PowPolicyArg {
    Trusting,
    Verifying,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ForkChoiceArg {
    LongestChain,
    MostWork,
}

impl From<PowPolicyArg> for PowPolicy {
    fn from(arg: PowPolicyArg) -> Self {
        match arg {
            PowPolicyArg::Trusting => PowPolicy::Trusting,
            PowPolicyArg::Verifying => PowPolicy::Verifying,
        }
    }
}

impl From<ForkChoiceArg> for ForkChoice {
    fn from(arg: ForkChoiceArg) -> Self {
        match arg {
            ForkChoiceArg::LongestChain => ForkChoice::LongestChain,
            ForkChoiceArg::MostWork => ForkChoice::MostWork,
        }
    }
}

impl Args {
    /// Parse the command line, load `--env-file` if it exists, then parse again
    /// so variables from the file feed the `env` fallbacks.
    pub fn load() -> (Self, bool) {
        let first = Self::parse();
        match dotenvy::from_path(&first.env_file) {
            Ok(()) => (Self::parse(), true),
            Err(_) => (first, false),
        }
    }

    pub fn chain_config(&self) -> ChainConfig {
        ChainConfig {
            pow_policy: self.pow_policy.into(),
            fork_choice: self.fork_choice.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["ledger-node", "--listen", "0.0.0.0:9000"]).unwrap();
        assert_eq!(args.listen, "0.0.0.0:9000");
        assert_eq!(args.env_file, PathBuf::from(".env"));
        assert_eq!(args.chain_config(), ChainConfig::default());
    }

    #[test]
    fn policy_flags() {
        let args = Args::try_parse_from([
            "ledger-node",
            "--pow-policy",
            "trusting",
            "--fork-choice",
            "most-work",
        ])
        .unwrap();
        let config = args.chain_config();
        assert_eq!(config.pow_policy, PowPolicy::Trusting);
        assert_eq!(config.fork_choice, ForkChoice::MostWork);
    }

    #[test]
    fn rejects_unknown_policy() {
        assert!(Args::try_parse_from(["ledger-node", "--pow-policy", "lenient"]).is_err());
    }
}
