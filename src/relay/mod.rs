pub mod protocol;
mod server;

use std::io;
use std::time::Instant;

use tracing::{info, warn};

use serde::Serialize;

use crate::error::InspectorError;
use crate::panel::{PanelConfig, PanelView};
use crate::relay::protocol::Outbound;

pub use server::{MessageRelay, PanelSession, Reaction};

/// Wire envelope for view models handed to the rendering collaborator.
#[derive(Serialize)]
struct RenderFrame<'a> {
    command: &'static str,
    view: &'a PanelView,
}

/// Run the relay loop over stdin/stdout until the host closes the stream.
///
/// Per-message decode failures and rejected snapshots are logged and
/// skipped; transport-level failures end the loop.
pub fn run_relay(config: PanelConfig) -> Result<(), InspectorError> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut relay = MessageRelay::new(stdin.lock(), stdout.lock());
    let mut session = PanelSession::new(config);

    relay.send(&Outbound::ViewLoaded)?;
    info!("relay started");

    loop {
        let msg = match relay.read_message() {
            Ok(Some(msg)) => msg,
            Ok(None) => break,
            Err(InspectorError::Payload(err)) => {
                warn!(%err, "skipping undecodable message");
                continue;
            }
            Err(err) => return Err(err),
        };

        match session.handle(msg, Instant::now()) {
            Ok(reaction) => {
                for out in &reaction.outbound {
                    relay.send(out)?;
                }
                if let Some(view) = &reaction.view {
                    relay.send(&RenderFrame {
                        command: "render",
                        view,
                    })?;
                }
            }
            Err(InspectorError::Snapshot(reason)) => {
                warn!(%reason, "rejecting host snapshot");
            }
            Err(err) => return Err(err),
        }
    }

    info!("relay stream closed");
    Ok(())
}
