//! Courier - a terminal dashboard for Briefcase document sharing
//!
//! This is the main entry point for the Courier application.

use anyhow::{Context, Result, anyhow};
use briefcase::{
    ActionLock, ClientSettings, Dashboard, DocumentApi, DocumentId, DownloadDir, DownloadOutcome,
    HttpDocumentApi, UploadForm, UploadResult,
};
use clap::{ArgAction, Parser, Subcommand};
use log::{error, info, warn};
use std::path::PathBuf;
use std::sync::Arc;

mod app;
mod input;
mod render;

use app::CourierApp;
use render::{TerminalRenderer, render_recipients, render_view};

#[derive(Parser)]
#[command(name = "courier", version, about = "Share and download documents with view limits")]
struct Cli {
    /// Server base URL (overrides settings.json and BRIEFCASE_SERVER)
    #[arg(long, global = true)]
    server: Option<String>,

    /// Directory downloads are saved to (overrides BRIEFCASE_DOWNLOAD_DIR)
    #[arg(long, global = true)]
    download_dir: Option<PathBuf>,

    /// Open each download with the system viewer
    #[arg(long, global = true)]
    open: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Live dashboard with periodic refresh (default)
    Watch,
    /// Print sent and received documents once
    List {
        /// Print the raw lists as JSON
        #[arg(long)]
        json: bool,
    },
    /// List users documents can be shared with
    Users,
    /// Share a file with another user
    Upload {
        file: PathBuf,
        /// Recipient user id
        #[arg(long)]
        to: u64,
        #[arg(long)]
        view_limit: Option<u32>,
        #[arg(long)]
        expires_in_days: Option<u32>,
    },
    /// Download a received document
    Download {
        id: String,
        /// Name to save under; looked up from the document list if omitted
        filename: Option<String>,
    },
    /// End the server session
    Logout,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_millis()
        .init();

    // Bootstrap config directory
    if let Err(e) = config::init() {
        error!("Failed to initialize config directory: {}", e);
    }

    let mut settings = ClientSettings::load().context("Failed to load settings")?;
    if let Some(server) = cli.server {
        settings.server_url = server;
    }
    if let Some(dir) = cli.download_dir {
        settings.download_dir = Some(dir);
    }
    if cli.open {
        settings.open_after_download = true;
    }

    let api = connect(&settings)?;
    let target = Arc::new(
        DownloadDir::new(settings.resolved_download_dir())
            .open_after_save(settings.open_after_download),
    );
    info!("Saving downloads to {}", target.dir().display());
    let color = !cli.no_color;

    match cli.command.unwrap_or(Commands::Watch) {
        Commands::Watch => {
            let renderer = Arc::new(TerminalRenderer::new(color));
            let dashboard = Dashboard::new(api, target, Some(renderer), settings.scheduler());
            let app = CourierApp::new(Arc::new(dashboard), ActionLock::new(settings.action_lock()));
            tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?
                .block_on(app.run())?;
        }
        Commands::List { json } => {
            let lists = api.documents()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&lists)?);
            } else {
                print!("{}", render_view(&briefcase::DashboardView::render(&lists), color));
            }
        }
        Commands::Users => {
            print!("{}", render_recipients(&api.users()?));
        }
        Commands::Upload {
            file,
            to,
            view_limit,
            expires_in_days,
        } => {
            let dashboard = Dashboard::new(api, target, None, settings.scheduler());
            let form = UploadForm {
                file,
                recipient_id: to,
                view_limit,
                expires_in_days,
            };
            match dashboard.submit_upload(&form) {
                UploadResult::Uploaded(receipt) => println!("{}", receipt.message),
                UploadResult::Rejected(message) => return Err(anyhow!(message)),
            }
        }
        Commands::Download { id, filename } => {
            let id = DocumentId::new(id);
            let dashboard = Dashboard::new(api, target, None, settings.scheduler());
            let filename = match filename {
                Some(name) => name,
                None => {
                    dashboard.registry().try_refresh()?;
                    dashboard
                        .registry()
                        .find(&id)
                        .map(|doc| doc.filename)
                        .ok_or_else(|| anyhow!("No document with id {}", id))?
                }
            };
            match dashboard.coordinator().request_download(&id, &filename) {
                DownloadOutcome::Success { saved_to } => {
                    println!("Saved {} to {}", filename, saved_to.display());
                }
                DownloadOutcome::Skipped => warn!("{} is already downloading", filename),
                DownloadOutcome::Failed(e) => return Err(anyhow!(e.user_message())),
            }
        }
        Commands::Logout => {
            api.logout()?;
            info!("Logged out");
        }
    }

    Ok(())
}

/// Build the HTTP client and establish a session
///
/// A stored token is used as is; otherwise configured credentials log in.
fn connect(settings: &ClientSettings) -> Result<Arc<dyn DocumentApi>> {
    let mut api = HttpDocumentApi::new(&settings.server_url, settings.request_timeout())?;

    if let Some(token) = &settings.session_token {
        api = api.with_token(token.clone());
    } else if let Some((email, password)) = settings.credentials() {
        let user = api
            .login(email, password)
            .map_err(|e| anyhow!("Login failed: {}", e.user_message("Login failed")))?;
        info!("Logged in as {}", user.display());
    } else {
        warn!("No credentials configured");
        if let Some(path) = ClientSettings::default_settings_path() {
            warn!(
                "To sign in, either:\n\
                 1. Add \"email\" and \"password\" to: {}\n\
                 2. Or set environment variables: BRIEFCASE_EMAIL and BRIEFCASE_PASSWORD",
                path.display()
            );
        }
    }

    Ok(Arc::new(api))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_server_and_download_dir_come_only_from_flags() {
        let cli = Cli::try_parse_from(["courier", "list"]).unwrap();
        assert_eq!(cli.server, None);
        assert_eq!(cli.download_dir, None);

        let cli = Cli::try_parse_from([
            "courier",
            "--server",
            "http://10.0.0.5:8000",
            "download",
            "7",
            "--download-dir",
            "/tmp/briefcase",
        ])
        .unwrap();
        assert_eq!(cli.server.as_deref(), Some("http://10.0.0.5:8000"));
        assert_eq!(cli.download_dir, Some(PathBuf::from("/tmp/briefcase")));
        assert!(matches!(cli.command, Some(Commands::Download { filename: None, .. })));
    }
}
