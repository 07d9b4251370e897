//! tracemark command-line client.
//!
//! Thin surface over the session layer: authenticate, list targets,
//! upload asset selections, rename, delete, and verify NFT
//! descriptors. Configuration comes from the environment (see
//! `RemoteConfig::from_env`).

use std::path::Path;

use anyhow::{bail, Context, Result};
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tracemark_core::classify::AssetFile;
use tracemark_core::target::{TargetChanges, TargetKind};
use tracemark_remote::{RemoteClient, RemoteConfig, SessionCache};
use tracemark_targets::{session, DescriptorVerifier, TargetRepository, TargetSession};

const USAGE: &str = "\
Usage: tracemark <command> [args]

Commands:
  login <email> <password>       Sign in and cache the session
  register <email> <password>    Create an account and sign in
  logout                         Clear the cached session
  list                           List your targets
  upload <file>...               Classify and upload a file selection
  rename <id> <name> [kind]      Rename a target (kind: nft|marker|image)
  delete <id>                    Delete a target and its objects
  verify <base-url>              Probe the three descriptor URLs
";

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tracemark=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first().map(String::as_str) else {
        print!("{USAGE}");
        return Ok(());
    };

    let config = RemoteConfig::from_env().map_err(|e| anyhow::anyhow!(e))?;
    tracing::debug!(base_url = %config.base_url, bucket = %config.bucket, "Loaded remote configuration");
    let cache = SessionCache::new(config.session_path.clone());
    let client = RemoteClient::new(config);

    match command {
        "login" => {
            let (email, password) = two_args(&args, "login <email> <password>")?;
            let s = session::login(&client.auth(), &cache, email, password).await?;
            println!("Logged in as {} ({})", s.email, s.uid);
        }
        "register" => {
            let (email, password) = two_args(&args, "register <email> <password>")?;
            let s = session::register(&client.auth(), &cache, email, password).await?;
            println!("Registered {} ({})", s.email, s.uid);
        }
        "logout" => {
            session::logout(&client.auth(), &cache).await?;
            println!("Logged out");
        }
        "list" => {
            let mut s = open_session(&cache, &client)?;
            s.refresh().await?;
            if s.targets().is_empty() {
                println!("No targets yet");
            }
            for t in s.targets() {
                println!(
                    "{}  {:<6}  {}  ({}x{})",
                    t.id,
                    t.kind,
                    t.display_name,
                    t.display_width(),
                    t.display_height()
                );
            }
        }
        "upload" => {
            if args.len() < 2 {
                bail!("upload needs at least one file");
            }
            let mut files = Vec::new();
            for raw in &args[1..] {
                files.push(read_asset(Path::new(raw)).await?);
            }
            let mut s = open_session(&cache, &client)?;
            let created = s.upload(files).await?;
            println!("Created {} target '{}' ({})", created.kind, created.display_name, created.id);
        }
        "rename" => {
            let (id, name) = two_args(&args, "rename <id> <name> [kind]")?;
            let kind = match args.get(3) {
                Some(raw) => Some(
                    TargetKind::from_str_value(raw)
                        .with_context(|| format!("unknown kind '{raw}' (nft|marker|image)"))?,
                ),
                None => None,
            };
            let changes = TargetChanges {
                display_name: Some(name.to_string()),
                kind,
                ..Default::default()
            };
            let mut s = open_session(&cache, &client)?;
            let updated = s.edit(&id.to_string(), &changes).await?;
            println!("Updated '{}'", updated.display_name);
        }
        "delete" => {
            let id = args.get(1).context("delete <id>")?;
            let mut s = open_session(&cache, &client)?;
            let outcome = s.delete(id).await?;
            if outcome.fully_clean() {
                println!("Deleted {id}");
            } else {
                println!(
                    "Deleted {id}; {} object(s) could not be cleaned up: {}",
                    outcome.objects_failed.len(),
                    outcome.objects_failed.join(", ")
                );
            }
        }
        "verify" => {
            let base_url = args.get(1).context("verify <base-url>")?;
            let (tx, mut rx) = mpsc::channel(8);
            let handle = DescriptorVerifier::new().spawn(
                base_url.clone(),
                tx,
                tokio_util::sync::CancellationToken::new(),
            );
            while let Some(report) = rx.recv().await {
                let status = match &report.outcome {
                    tracemark_targets::ProbeOutcome::Found => "ok".to_string(),
                    tracemark_targets::ProbeOutcome::Status(code) => format!("HTTP {code}"),
                    tracemark_targets::ProbeOutcome::Unreachable(e) => format!("unreachable: {e}"),
                };
                println!("{}  {status}", report.url);
            }
            handle.await.ok();
        }
        other => {
            eprintln!("Unknown command '{other}'\n");
            print!("{USAGE}");
            std::process::exit(2);
        }
    }

    Ok(())
}

fn open_session(
    cache: &SessionCache,
    client: &RemoteClient,
) -> Result<TargetSession<tracemark_remote::http::HttpObjectStore, tracemark_remote::http::HttpRecordStore>> {
    let repo = TargetRepository::new(client.object_store(), client.record_store());
    TargetSession::open(cache, repo).context("run `tracemark login` first")
}

fn two_args<'a>(args: &'a [String], usage: &str) -> Result<(&'a str, &'a str)> {
    match (args.get(1), args.get(2)) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => bail!("usage: tracemark {usage}"),
    }
}

/// Read a local file into an [`AssetFile`], guessing the media type
/// from the extension.
async fn read_asset(path: &Path) -> Result<AssetFile> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("bad file name: {}", path.display()))?
        .to_string();
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let media_type = AssetFile::media_type_for_name(&name).to_string();
    Ok(AssetFile::new(name, media_type, bytes))
}
