use std::sync::Arc;

use anyhow::Result;
use serde_json::{json, Value};
use tracing::info;

use livehost_core::{
    bootstrap::{init_database, init_services},
    models::{Identity, UserId},
    service::{IdentityResolver, StaticIdentity},
    Config,
};

use crate::Command;

/// Execute one command and return its JSON result
pub async fn run(config: &Config, command: Command) -> Result<Value> {
    let identity: Arc<dyn IdentityResolver> = match &command {
        Command::Create {
            user_id, username, ..
        }
        | Command::Keys {
            user_id, username, ..
        } => Arc::new(StaticIdentity::new(Identity::new(user_id.as_str(), username.as_str()))),
        Command::Reset { .. } => Arc::new(StaticIdentity::anonymous()),
    };

    let pool = init_database(config).await?;
    let services = init_services(pool, config, identity)?;
    let provisioner = &services.provisioner;

    match command {
        Command::Reset { host_id } => {
            provisioner.reset(&UserId::from(host_id.as_str())).await?;
            info!(%host_id, "Host reset");
            Ok(json!({ "host_id": host_id, "reset": true }))
        }
        Command::Create { mode, .. } => {
            let info = provisioner.create(mode.into()).await?;
            Ok(serde_json::to_value(info)?)
        }
        Command::Keys {
            user_id, host_id, ..
        } => {
            let owner = host_id.unwrap_or(user_id);
            let stream = provisioner.keys(&UserId::from(owner.as_str())).await?;
            Ok(serde_json::to_value(stream)?)
        }
    }
}
