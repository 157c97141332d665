// SPDX-FileCopyrightText: 2026 Punchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `config` command: the external surface that owns the sync-config
//! row. The core jobs only ever read it.

use clap::Subcommand;
use punchsync_config::PunchsyncConfig;
use punchsync_core::PunchsyncError;
use punchsync_core::types::SyncConfig;
use punchsync_storage::queries;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the current sync configuration.
    Show,
    /// Create or update the sync configuration. Unset flags keep their
    /// current values.
    Set {
        #[arg(long)]
        company_id: Option<String>,
        #[arg(long)]
        api_username: Option<String>,
        #[arg(long)]
        api_password: Option<String>,
        #[arg(long)]
        device_ip: Option<String>,
        #[arg(long)]
        device_port: Option<u16>,
        #[arg(long)]
        collection_interval_secs: Option<i64>,
        #[arg(long)]
        upload_interval_secs: Option<i64>,
        #[arg(long)]
        user_import_interval_secs: Option<i64>,
    },
}

pub async fn run(config: &PunchsyncConfig, command: ConfigCommands) -> Result<(), PunchsyncError> {
    let db = crate::open_database(config).await?;

    match command {
        ConfigCommands::Show => match queries::sync_config::get_sync_config(&db).await? {
            Some(sync_config) => print_config(&sync_config),
            None => println!("sync configuration: not set"),
        },
        ConfigCommands::Set {
            company_id,
            api_username,
            api_password,
            device_ip,
            device_port,
            collection_interval_secs,
            upload_interval_secs,
            user_import_interval_secs,
        } => {
            let current = queries::sync_config::get_sync_config(&db)
                .await?
                .unwrap_or_default();
            let updated = merge(
                current,
                company_id,
                api_username,
                api_password,
                device_ip,
                device_port,
                collection_interval_secs,
                upload_interval_secs,
                user_import_interval_secs,
            );
            queries::sync_config::save_sync_config(&db, &updated).await?;
            println!("sync configuration saved");
            print_config(&updated);
        }
    }

    db.close().await
}

#[allow(clippy::too_many_arguments)]
fn merge(
    mut config: SyncConfig,
    company_id: Option<String>,
    api_username: Option<String>,
    api_password: Option<String>,
    device_ip: Option<String>,
    device_port: Option<u16>,
    collection_interval_secs: Option<i64>,
    upload_interval_secs: Option<i64>,
    user_import_interval_secs: Option<i64>,
) -> SyncConfig {
    if let Some(v) = company_id {
        config.company_id = v;
    }
    if let Some(v) = api_username {
        config.api_username = v;
    }
    if let Some(v) = api_password {
        config.api_password = v;
    }
    if let Some(v) = device_ip {
        config.device_ip = v;
    }
    if let Some(v) = device_port {
        config.device_port = v;
    }
    if let Some(v) = collection_interval_secs {
        config.collection_interval_secs = v;
    }
    if let Some(v) = upload_interval_secs {
        config.upload_interval_secs = v;
    }
    if let Some(v) = user_import_interval_secs {
        config.user_import_interval_secs = v;
    }
    config
}

fn print_config(config: &SyncConfig) {
    println!("company:                   {}", config.company_id);
    println!("api username:              {}", config.api_username);
    println!("api password:              ********");
    println!("device:                    {}:{}", config.device_ip, config.device_port);
    println!("collection interval:       {}s", config.collection_interval_secs);
    println!("upload interval:           {}s", config.upload_interval_secs);
    println!("user import interval:      {}s", config.user_import_interval_secs);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_keeps_unset_fields() {
        let current = SyncConfig {
            company_id: "acme-42".to_string(),
            api_username: "clock-bot".to_string(),
            upload_interval_secs: 1200,
            ..SyncConfig::default()
        };

        let merged = merge(
            current,
            None,
            None,
            Some("s3cret".to_string()),
            None,
            Some(4371),
            None,
            None,
            None,
        );

        assert_eq!(merged.company_id, "acme-42");
        assert_eq!(merged.api_username, "clock-bot");
        assert_eq!(merged.api_password, "s3cret");
        assert_eq!(merged.device_port, 4371);
        assert_eq!(merged.upload_interval_secs, 1200);
    }
}
