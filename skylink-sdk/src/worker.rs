//! Background worker thread for command processing.
//!
//! Spawns a thread with its own tokio runtime that owns the broker and the
//! registration controller, so the parent [`SkylinkManager`] can expose a
//! fully synchronous API.
//!
//! [`SkylinkManager`]: crate::manager::SkylinkManager

use std::sync::mpsc::{self, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use skylink_broker::{
    BrokerError, OutcomeReceiver, RegistrationController, TelemetryBroker,
};

/// Commands sent from the sync facade to the background worker.
#[derive(Debug)]
pub enum Command {
    /// Start a registration attempt; replies with the one-shot outcome
    /// receiver for that attempt
    Register {
        bridge_address: Option<String>,
        reply: mpsc::Sender<OutcomeReceiver<Result<(), BrokerError>>>,
    },
    /// Start a push subscription for a symbolic key name
    StartListener {
        name: String,
        reply: mpsc::Sender<Result<(), BrokerError>>,
    },
    /// Stop the push subscription for a symbolic key name
    StopListener {
        name: String,
        reply: mpsc::Sender<Result<(), BrokerError>>,
    },
    /// Tear down all remaining subscriptions and exit
    Shutdown,
}

/// Spawn the background worker thread.
///
/// The worker owns its own tokio runtime and drives the broker and the
/// registration controller; registration outcome forwarding runs as spawned
/// tasks on the same runtime.
pub fn spawn_worker(
    broker: TelemetryBroker,
    controller: RegistrationController,
    command_rx: mpsc::Receiver<Command>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let rt = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(error) => {
                tracing::error!(%error, "failed to create tokio runtime for skylink worker");
                return;
            }
        };

        rt.block_on(run_command_loop(broker, controller, command_rx));
    })
}

async fn run_command_loop(
    broker: TelemetryBroker,
    controller: RegistrationController,
    command_rx: mpsc::Receiver<Command>,
) {
    tracing::info!("skylink worker started");

    loop {
        // Sleep-poll so spawned registration tasks keep making progress
        // between command batches
        tokio::time::sleep(Duration::from_millis(10)).await;

        loop {
            match command_rx.try_recv() {
                Ok(Command::Register {
                    bridge_address,
                    reply,
                }) => {
                    tracing::debug!(bridge = ?bridge_address, "worker: starting registration");
                    let outcome = controller.register(bridge_address).await;
                    let _ = reply.send(outcome);
                }
                Ok(Command::StartListener { name, reply }) => {
                    tracing::debug!(key = %name, "worker: starting listener");
                    let _ = reply.send(broker.start_listener(&name).await);
                }
                Ok(Command::StopListener { name, reply }) => {
                    tracing::debug!(key = %name, "worker: stopping listener");
                    let _ = reply.send(broker.stop_listener(&name).await);
                }
                Ok(Command::Shutdown) => {
                    tracing::info!("worker received shutdown command");
                    broker.shutdown().await;
                    tracing::info!("skylink worker shut down");
                    return;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::debug!("command senders dropped, shutting down worker");
                    broker.shutdown().await;
                    return;
                }
            }
        }
    }
}
