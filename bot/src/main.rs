use std::process::ExitCode;
use std::sync::Arc;

use darkest::prelude::*;
use darkest_login::{
    DEFAULT_CREDENTIALS_FILE, FileCredentials, HttpTicketEndpoint, TicketConfig, TicketFactory,
};

// ---------------------------------------------------------------------------
// Startup
// ---------------------------------------------------------------------------

/// Gets a ticket and runs one session.
async fn run(state: Arc<StateManager>, cancel: &CancellationToken) -> Result<(), BotError> {
    let factory = TicketFactory::new(
        HttpTicketEndpoint::new()?,
        FileCredentials::from_env(DEFAULT_CREDENTIALS_FILE),
        TicketConfig::default(),
    );

    let Some(ticket) = factory.get_ticket(cancel).await? else {
        tracing::error!("could not get ticket");
        return Err(BotError::NoCredentials);
    };

    connect_and_run(state, &ticket, &BotConfig::default(), cancel).await
}

/// Cancels `cancel` on Ctrl-C.
fn cancel_on_interrupt(cancel: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("interrupt received");
                cancel.cancel();
            }
            Err(e) => tracing::warn!(error = %e, "unable to listen for interrupts"),
        }
    });
}

#[tokio::main]
async fn main() -> ExitCode {
    darkest::logging::init();

    let cancel = CancellationToken::new();
    cancel_on_interrupt(cancel.clone());

    let state = match StateManager::load_or_init(StateConfig::default()).await {
        Ok(state) => Arc::new(state),
        Err(e) => {
            tracing::error!(error = %e, "unable to read state file, human intervention required");
            return ExitCode::FAILURE;
        }
    };

    match run(state, &cancel).await {
        Ok(()) => {
            tracing::info!("session ended");
            ExitCode::SUCCESS
        }
        Err(e) if e.is_cancelled() => {
            tracing::info!("shutting bot down");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "error while running the bot");
            ExitCode::FAILURE
        }
    }
}
