// chat-widget - A floating chat widget for the terminal
// Copyright (C) 2025  Simon Peter Rothgang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use chat_widget::Cli;
use chat_widget::app::App;
use chat_widget::config::WidgetConfig;
use chat_widget::embed::WidgetRegistry;
use chat_widget::error::AppError;
use clap::Parser;
use std::fs::OpenOptions;
use std::io::IsTerminal;

const DEFAULT_LOG_FILTER: &str = "chat_widget=info";

#[allow(clippy::exit)]
fn main() {
    if let Err(err) = run() {
        if let Some(app_error) = extract_app_error(&err) {
            eprintln!("{}", app_error.user_message());
            std::process::exit(app_error.exit_code());
        }
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli)?;

    let config = WidgetConfig::load(&cli)?;
    if !std::io::stdin().is_terminal() || !std::io::stdout().is_terminal() {
        return Err(AppError::TerminalUnavailable.into());
    }

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        // The host side: mount the widget once and keep its handle alive
        let mut registry = WidgetRegistry::new();
        let _handle = registry.ensure_injected(&config.embed);

        let mut app = App::new(config);
        if let Some(rx) = registry.take_receiver() {
            app.attach_host(rx);
        }
        chat_widget::app::run_tui(&mut app).await
    })
}

fn extract_app_error(err: &anyhow::Error) -> Option<AppError> {
    err.chain().find_map(|cause| cause.downcast_ref::<AppError>().cloned())
}

/// Diagnostics go to a file only; the terminal belongs to the widget.
fn init_tracing(cli: &Cli) -> anyhow::Result<()> {
    let Some(path) = cli.log_file.as_deref() else {
        if std::env::var_os("RUST_LOG").is_some() {
            eprintln!("RUST_LOG has no effect without --log-file <PATH>.");
        }
        return Ok(());
    };

    let directives = match (&cli.log_filter, std::env::var("RUST_LOG")) {
        (Some(filter), _) => filter.clone(),
        (None, Ok(env)) => env,
        (None, Err(_)) => DEFAULT_LOG_FILTER.to_owned(),
    };
    let filter = tracing_subscriber::EnvFilter::try_new(&directives)
        .map_err(|e| anyhow::anyhow!("bad --log-filter `{directives}`: {e}"))?;

    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(cli.log_append)
        .truncate(!cli.log_append)
        .open(path)
        .map_err(|e| anyhow::anyhow!("cannot open log file {}: {e}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(file)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("tracing setup failed: {e}"))?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), filter = %directives, "chat widget starting");
    Ok(())
}
