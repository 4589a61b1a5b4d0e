// Path: crates/node/src/main.rs

//! The contract process binary.
//!
//! Bootstrap order is fixed: telemetry, configuration, state load (fatal on
//! a corrupt state file), dispatcher wiring, then the serve loop. The
//! consensus host feeds round descriptors on stdin, one JSON object per
//! line, naming the round key and each user's input/output fds; responses
//! go back as length-prefixed frames on the per-user output fds.
//!
//! The token adapter starts in simulated mode; a deployment that submits to
//! a real ledger injects its client and signers at this seam. All replicas
//! must be wired the same way, simulated or submitted, never mixed.

use anyhow::{Context, Result};
use clap::Parser;
use std::os::fd::FromRawFd;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use xvault_contract::{ContractConfig, Dispatcher, TokenAdapter};
use xvault_node::runtime::{RoundDescriptor, RuntimeAdapter};
use xvault_node::telemetry;
use xvault_store::VaultStore;
use xvault_types::config::NodeConfig;

/// Startup options for the contract process.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct NodeOpts {
    /// Path to the TOML configuration file; a missing file means defaults.
    #[arg(long, default_value = "xvault.toml")]
    config: PathBuf,

    /// Overrides the configured state-file path.
    #[arg(long)]
    state_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing()?;
    let opts = NodeOpts::parse();

    let mut config = NodeConfig::load_or_default(&opts.config)
        .with_context(|| format!("loading config from {}", opts.config.display()))?;
    if let Some(path) = opts.state_file {
        config.state_file = path;
    }

    let store = VaultStore::open(config.state_file.clone()).context("opening vault state")?;
    tracing::info!(
        target: "xvault::node",
        state_file = %config.state_file.display(),
        vaults = store.len(),
        team_mode = config.team_mode,
        mutable_uri_tokens = config.mutable_uri_tokens,
        dev_fallback = config.dev_fallback,
        "starting contract process"
    );

    let dispatcher = Dispatcher::with_tracing_audit(
        store,
        TokenAdapter::simulated(),
        ContractConfig::from(&config),
    );
    let mut runtime = RuntimeAdapter::new(dispatcher);
    serve(&mut runtime).await
}

/// Reads round descriptors from stdin and drives the fd channels they name.
async fn serve(runtime: &mut RuntimeAdapter) -> Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let descriptor: RoundDescriptor =
            serde_json::from_str(line).context("malformed round descriptor")?;

        for user in &descriptor.users {
            // The host hands this process ownership of both fds for the
            // duration of the round; dropping the files closes them.
            let std_in = unsafe { std::fs::File::from_raw_fd(user.fd_in) };
            let std_out = unsafe { std::fs::File::from_raw_fd(user.fd_out) };
            let mut input = tokio::fs::File::from_std(std_in);
            let mut output = tokio::fs::File::from_std(std_out);
            runtime
                .process_user_channel(&descriptor.round_key, &user.user, &mut input, &mut output)
                .await
                .with_context(|| format!("processing channel for user {}", user.user))?;
        }

        let digest = runtime
            .dispatcher()
            .state_digest()
            .context("computing round digest")?;
        tracing::info!(
            target: "xvault::node",
            round = %descriptor.round_key,
            users = descriptor.users.len(),
            digest = %digest,
            "round complete"
        );
    }
    tracing::info!(target: "xvault::node", "host closed stdin, shutting down");
    Ok(())
}
