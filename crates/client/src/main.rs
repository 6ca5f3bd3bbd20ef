//! `pothole` -- line-oriented console for the pothole board.
//!
//! Talks to a running authority (`pothole-api`) and keeps the board view
//! locally. Type `help` for the command list.
//!
//! # Environment variables
//!
//! | Variable                 | Default                 | Description                     |
//! |--------------------------|-------------------------|---------------------------------|
//! | `AUTHORITY_URL`          | `http://127.0.0.1:5000` | Authority base URL              |
//! | `AUTHORITY_TIMEOUT_SECS` | `30`                    | Per-request timeout             |
//! | `OUTPUT_DIR`             | `.`                     | Where exports/reports are saved |

use std::path::Path;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pothole_client::api::AuthorityApi;
use pothole_client::authority::{Download, Upload};
use pothole_client::command::{self, format_table, Command, HELP};
use pothole_client::config::ClientConfig;
use pothole_client::session::Session;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pothole_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ClientConfig::from_env();
    let api = AuthorityApi::new(config.authority_url.clone(), config.timeout()).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to build HTTP client");
        std::process::exit(1);
    });
    tracing::info!(
        authority = %api.base_url(),
        output_dir = %config.output_dir.display(),
        "Starting pothole console",
    );

    let mut session = Session::new(Arc::new(api));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{HELP}");
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read stdin");
                break;
            }
        };

        let command = match command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("error: {e}");
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }
        if let Err(message) = execute(&mut session, command, &config).await {
            println!("error: {message}");
        }
    }

    // Let the last board upload finish before exiting.
    session.wait_for_upload().await;
}

/// Run one command; the error is a single user-facing line.
async fn execute(
    session: &mut Session<AuthorityApi>,
    command: Command,
    config: &ClientConfig,
) -> Result<(), String> {
    let show_table = matches!(
        command,
        Command::Add { .. }
            | Command::Insert { .. }
            | Command::Update { .. }
            | Command::Remove { .. }
            | Command::Reset
            | Command::Load { .. }
            | Command::Import { .. }
            | Command::Show
    );

    match command {
        Command::Add { width, length } => session.add(width, length).await.map_err(|e| e.to_string())?,
        Command::Insert {
            position,
            width,
            length,
        } => session
            .insert_at(position, width, length)
            .await
            .map_err(|e| e.to_string())?,
        Command::Update {
            index,
            width,
            length,
        } => session
            .update(index, width, length)
            .await
            .map_err(|e| e.to_string())?,
        Command::Remove { index } => session.remove(index).await.map_err(|e| e.to_string())?,
        Command::Reset => session.reset().await.map_err(|e| e.to_string())?,
        Command::Save { name } => {
            session.save(&name).await.map_err(|e| e.to_string())?;
            println!("saved '{}'", name.trim());
        }
        Command::Load { name } => session.load(&name).await.map_err(|e| e.to_string())?,
        Command::Export { name } => {
            let download = session.export(&name).await.map_err(|e| e.to_string())?;
            write_download(&config.output_dir, &download).await?;
        }
        Command::Import { path } => {
            let bytes = tokio::fs::read(&path)
                .await
                .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "upload".to_string());
            session
                .import(Upload { filename, bytes })
                .await
                .map_err(|e| e.to_string())?;
        }
        Command::Report { name } => {
            let download = session.generate_report(&name).await.map_err(|e| e.to_string())?;
            write_download(&config.output_dir, &download).await?;
        }
        Command::PointerDown(at) => match session.pointer_down(at) {
            Some(index) => println!("grabbed #{}", index + 1),
            None => println!("nothing at ({}, {})", at.x, at.y),
        },
        Command::PointerMove(at) => {
            if let Some(index) = session.pointer_move(at) {
                if let Some(p) = session.board().positions().get(index) {
                    println!("#{} at ({:.1}, {:.1})", index + 1, p.x, p.y);
                }
            }
        }
        Command::PointerUp => session.pointer_up(),
        Command::Snapshot { path } => {
            let png = session.snapshot_png().map_err(|e| e.to_string())?;
            tokio::fs::write(&path, png)
                .await
                .map_err(|e| format!("cannot write {}: {e}", path.display()))?;
            println!("wrote {}", path.display());
        }
        Command::Show => {}
        Command::Help => println!("{HELP}"),
        Command::Quit => {}
    }

    if show_table {
        print!("{}", format_table(session.potholes(), &session.summary()));
    }
    Ok(())
}

async fn write_download(dir: &Path, download: &Download) -> Result<(), String> {
    // Only the final component of the suggested name is used.
    let name = Path::new(&download.filename)
        .file_name()
        .ok_or_else(|| format!("unusable download name '{}'", download.filename))?;
    let path = dir.join(name);
    tokio::fs::write(&path, &download.bytes)
        .await
        .map_err(|e| format!("cannot write {}: {e}", path.display()))?;
    println!("wrote {} ({} bytes)", path.display(), download.bytes.len());
    Ok(())
}
