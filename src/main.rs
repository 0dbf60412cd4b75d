mod analytics;
mod classifier;
mod cli;
mod config;
mod error;
mod forms;
mod notification;
mod telemetry;
mod ui;
mod validator;
mod waitlist;
mod widget;

use std::io::BufRead;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Result, bail};
use clap::Parser;
use console::Style;
use tokio::sync::oneshot;

use analytics::TracingSink;
use cli::{Cli, Command};
use config::{ACCESS_KEY_ENV, WaitlistConfig};
use forms::FormsClient;
use notification::Notice;
use ui::{SubmitProgress, Toast};
use waitlist::{FormSettings, SubmitOutcome, WaitlistForm};
use widget::{LoadStatus, SnippetLoader, WidgetLoader};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "warn" };
    telemetry::init_subscriber(level, std::io::stderr)?;

    let config = match &cli.config {
        Some(path) => {
            WaitlistConfig::load_explicit(path)?.with_env_key(std::env::var(ACCESS_KEY_ENV).ok())
        }
        None => WaitlistConfig::load()?,
    };

    match cli.command {
        Command::Submit {
            email,
            timeout,
            no_wait,
            no_analytics,
        } => {
            let accepted = run_submit(&config, &email, timeout, no_wait, no_analytics).await?;
            Ok(exit_code(accepted))
        }
        Command::Validate { email } => {
            let valid = validator::is_valid_email(email.trim());
            if valid {
                println!("{} {email}", Style::new().green().bold().apply_to("✓"));
            } else {
                println!(
                    "{} {}",
                    Style::new().red().bold().apply_to("✗"),
                    classifier::ErrorCategory::Validation.message()
                );
            }
            Ok(exit_code(valid))
        }
        Command::Widget => {
            let mut loader = SnippetLoader::new(std::io::stdout().lock());
            match loader.load(&config.chat_widget)? {
                LoadStatus::Skipped => bail!("chat_widget.token is not configured"),
                LoadStatus::Loaded | LoadStatus::AlreadyLoaded => Ok(ExitCode::SUCCESS),
            }
        }
        Command::Messages => {
            ui::print_messages();
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn exit_code(ok: bool) -> ExitCode {
    if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

async fn run_submit(
    config: &WaitlistConfig,
    email: &str,
    timeout: Option<u64>,
    no_wait: bool,
    no_analytics: bool,
) -> Result<bool> {
    let deadline = timeout.map(Duration::from_secs).unwrap_or_else(|| config.timeout());
    if deadline.is_zero() {
        bail!("--timeout must be greater than zero");
    }

    let client = FormsClient::with_endpoint(config.endpoint.clone(), deadline)?;
    let mut form = WaitlistForm::new(
        client,
        FormSettings::from(config),
        Notice::new(config.display_duration()),
    );
    if config.analytics && !no_analytics {
        form = form.with_analytics(Box::new(TracingSink));
    }

    let progress = SubmitProgress::start();
    let outcome = form.submit(email).await;
    progress.finish();

    let notice = form.notice();
    tracing::debug!(history = ?notice.history, updated_at = %notice.updated_at, "submission finished");

    let mut toast = Toast::new();
    toast.show(&notice, !no_wait);
    if !no_wait {
        hold_toast(&form, &mut toast).await;
    }

    Ok(outcome == SubmitOutcome::Accepted)
}

/// Keep the toast on screen until it expires or Enter dismisses it.
async fn hold_toast<S: forms::FormSender>(form: &WaitlistForm<S>, toast: &mut Toast) {
    // A blocking read on a plain thread: tokio's stdin cannot be cancelled
    // and would hold the runtime open after expiry.
    let (tx, rx) = oneshot::channel();
    std::thread::spawn(move || {
        let mut line = String::new();
        // EOF drops the sender, which leaves only the expiry branch.
        if let Ok(n) = std::io::stdin().lock().read_line(&mut line)
            && n > 0
        {
            let _ = tx.send(());
        }
    });

    tokio::select! {
        expired = form.expire_when_due() => {
            if expired {
                toast.clear();
            }
        }
        Ok(()) = rx => {
            form.dismiss();
            toast.dismissed();
        }
    }
}
