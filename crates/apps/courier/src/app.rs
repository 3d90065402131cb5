//! Live dashboard loop
//!
//! A single-threaded tokio loop reads commands from stdin and fires the
//! periodic refresh. Every call into the library blocks on the network, so
//! it goes through `spawn_blocking`; downloads and uploads are not awaited
//! inline so the prompt stays responsive while they run.

use anyhow::{Result, bail};
use briefcase::{
    ActionLock, Dashboard, DashboardEvent, DownloadOutcome, ListKind, Recipient, UploadForm,
    UploadResult,
};
use log::{debug, error, info};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;

use crate::input::Command;
use crate::render::{download_status, render_help, render_recipients};

pub struct CourierApp {
    dashboard: Arc<Dashboard>,
    lock: Arc<ActionLock>,
    recipients: Vec<Recipient>,
}

impl CourierApp {
    pub fn new(dashboard: Arc<Dashboard>, lock: ActionLock) -> Self {
        Self {
            dashboard,
            lock: Arc::new(lock),
            recipients: Vec::new(),
        }
    }

    pub async fn run(mut self) -> Result<()> {
        let dashboard = Arc::clone(&self.dashboard);
        let Some(start) = tokio::task::spawn_blocking(move || dashboard.start()).await? else {
            bail!("Not signed in. Set BRIEFCASE_EMAIL and BRIEFCASE_PASSWORD, or BRIEFCASE_TOKEN");
        };
        info!("Signed in as {}", start.user.display());
        self.recipients = start.recipients;
        println!("Type ? for commands");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut ticker = tokio::time::interval(self.dashboard.scheduler().interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately and start() already refreshed
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => self.fire(DashboardEvent::TimerTick),
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        debug!("stdin closed");
                        break;
                    };
                    if !self.handle_line(&line).await {
                        break;
                    }
                }
            }
        }
        Ok(())
    }

    /// Returns `false` when the user asked to quit
    async fn handle_line(&mut self, line: &str) -> bool {
        if line.trim().is_empty() {
            return true;
        }
        match Command::parse(line) {
            Ok(Command::Quit) => return false,
            Ok(Command::DownloadReceived(n)) => self.activate(ListKind::Received, n),
            Ok(Command::ViewSent(n)) => self.activate(ListKind::Sent, n),
            Ok(Command::Upload {
                file,
                recipient,
                view_limit,
                expires_in_days,
            }) => {
                let Some(to) = self.recipients.get(recipient - 1) else {
                    println!("No recipient {recipient} (type p to list recipients)");
                    return true;
                };
                self.upload(UploadForm {
                    file,
                    recipient_id: to.id,
                    view_limit,
                    expires_in_days,
                });
            }
            Ok(Command::Recipients) => {
                let dashboard = Arc::clone(&self.dashboard);
                match tokio::task::spawn_blocking(move || dashboard.recipients()).await {
                    Ok(recipients) => self.recipients = recipients,
                    Err(e) => error!("Recipient lookup task failed: {}", e),
                }
                print!("{}", render_recipients(&self.recipients));
            }
            Ok(Command::Refresh) => {
                let dashboard = Arc::clone(&self.dashboard);
                tokio::task::spawn_blocking(move || dashboard.registry().refresh());
            }
            Ok(Command::Help) => print!("{}", render_help()),
            Err(message) => println!("{message}"),
        }
        true
    }

    /// Activate the download control of card `n` in `kind`
    fn activate(&self, kind: ListKind, n: usize) {
        let Some(view) = self.dashboard.registry().view() else {
            println!("Documents have not loaded yet");
            return;
        };
        let Some(card) = view.list(kind).cards().get(n - 1).cloned() else {
            println!("No document {n} in that list");
            return;
        };
        if !card.has_action() {
            println!("{} is no longer available", card.filename);
            return;
        }
        let engaged = self.lock.try_engage(&card.id);
        print!("{}", download_status(&card.filename, engaged));
        if !engaged {
            return;
        }

        let dashboard = Arc::clone(&self.dashboard);
        tokio::spawn(async move {
            let filename = card.filename.clone();
            let outcome =
                tokio::task::spawn_blocking(move || dashboard.download(&card.id, &card.filename))
                    .await;
            match outcome {
                Ok(DownloadOutcome::Success { saved_to }) => {
                    println!("Saved {} to {}", filename, saved_to.display());
                }
                Ok(DownloadOutcome::Skipped) => debug!("{} already downloading", filename),
                Ok(DownloadOutcome::Failed(e)) => println!("Alert: {}", e.user_message()),
                Err(e) => error!("Download task failed: {}", e),
            }
        });
    }

    fn upload(&self, form: UploadForm) {
        let dashboard = Arc::clone(&self.dashboard);
        tokio::spawn(async move {
            match tokio::task::spawn_blocking(move || dashboard.submit_upload(&form)).await {
                Ok(UploadResult::Uploaded(receipt)) => println!("{}", receipt.message),
                Ok(UploadResult::Rejected(message)) => println!("Upload failed: {message}"),
                Err(e) => error!("Upload task failed: {}", e),
            }
        });
    }

    fn fire(&self, event: DashboardEvent) {
        let dashboard = Arc::clone(&self.dashboard);
        tokio::task::spawn_blocking(move || dashboard.dispatch(event));
    }
}
