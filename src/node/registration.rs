//! Node self-registration.
//!
//! `Unregistered -> Registering -> Registered`, or back to `Unregistered`
//! once the attempt budget is spent. The loop runs once, before the node
//! starts serving; there is no background retry afterwards.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::service::NodeService;
use crate::coordinator::protocol::{ENDPOINT_REGISTER, RegisterRequest};

const REGISTER_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationState {
    Unregistered,
    Registering,
    Registered,
}

/// Announces `node_url` to the coordinator, trying at most `attempts` times
/// with a fixed `delay` between failures. Returns the final state, which is
/// also recorded on `node`.
pub async fn register_with_coordinator(
    node: &NodeService,
    coordinator_url: &str,
    node_url: &str,
    attempts: u32,
    delay: Duration,
) -> RegistrationState {
    node.set_registration_state(RegistrationState::Registering).await;

    let client = match reqwest::Client::builder()
        .no_proxy()
        .timeout(REGISTER_REQUEST_TIMEOUT)
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Could not build registration client: {}", e);
            node.set_registration_state(RegistrationState::Unregistered).await;
            return RegistrationState::Unregistered;
        }
    };

    let url = format!("{}{}", coordinator_url.trim_end_matches('/'), ENDPOINT_REGISTER);
    let payload = RegisterRequest {
        node_url: node_url.to_string(),
    };

    for attempt in 1..=attempts {
        match client.post(&url).json(&payload).send().await {
            Ok(resp) if resp.status().is_success() => {
                tracing::info!("Registered with coordinator as {}", node_url);
                node.set_registration_state(RegistrationState::Registered).await;
                return RegistrationState::Registered;
            }
            Ok(resp) => {
                tracing::warn!(
                    "Registration attempt {}/{} rejected: {}",
                    attempt,
                    attempts,
                    resp.status()
                );
            }
            Err(e) => {
                tracing::warn!(
                    "Registration attempt {}/{} failed: {}",
                    attempt,
                    attempts,
                    e
                );
            }
        }

        if attempt < attempts {
            tokio::time::sleep(delay).await;
        }
    }

    tracing::error!(
        "Giving up on registration with {} after {} attempts; node stays unregistered",
        coordinator_url,
        attempts
    );
    node.set_registration_state(RegistrationState::Unregistered).await;
    RegistrationState::Unregistered
}
