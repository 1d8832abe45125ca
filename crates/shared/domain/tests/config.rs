use aegis_domain::config::{ClientConfig, InstanceConfig, LoggingConfig, PathsConfig};
use aegis_domain::credentials::ServerCredentials;
use aegis_domain::instance::{ExitStatus, StartupFlags};
use aegis_domain::platform::{InitialVisibility, VisibilityPolicy};
use aegis_domain::settings::Settings;
use serde_json::json;
use std::time::Duration;

#[test]
fn config_defaults_are_sane() {
    let instance = InstanceConfig::default();
    assert_eq!(instance.name, "aegis");
    assert!(!instance.allow_secondary);
    assert_eq!(instance.arbitration_timeout(), Duration::from_millis(500));

    let paths = PathsConfig::default();
    assert!(paths.assets_dir.is_none());
    assert!(paths.config_dir.is_none());

    let logging = LoggingConfig::default();
    assert_eq!(logging.level, "info");
    assert!(logging.console);
    assert_eq!(logging.max_files, 10);
}

#[test]
fn client_config_deserializes_partial_sections() {
    let raw = json!({
        "instance": { "allow_secondary": true },
        "paths": { "log_dir": "/tmp/aegis/log" }
    });

    let cfg: ClientConfig = serde_json::from_value(raw).expect("config deserialize");
    assert!(cfg.instance.allow_secondary);
    assert_eq!(cfg.instance.name, "aegis");
    assert_eq!(cfg.paths.log_dir.as_deref(), Some(std::path::Path::new("/tmp/aegis/log")));
    assert!(cfg.logging.console);
}

#[test]
fn config_clones_share_until_mutated() {
    let original = ClientConfig::default();
    let mut copy = original.clone();
    copy.instance.allow_secondary = true;

    assert!(!original.instance.allow_secondary);
    assert!(copy.instance.allow_secondary);
}

#[test]
fn settings_ignore_foreign_keys() {
    let raw = "save_logs = true\nlanguage = \"de\"\n";
    let settings: Settings = toml::from_str(raw).expect("settings parse");

    assert!(settings.save_logs);
    assert!(!settings.start_minimized);
    assert!(!settings.permissions_fixed);
}

#[test]
fn credentials_require_every_field() {
    let mut creds = ServerCredentials {
        host_name: "vpn.example.org".into(),
        user_name: "root".into(),
        password: "secret".into(),
        port: 22,
    };
    assert!(creds.is_valid());

    creds.port = 0;
    assert!(!creds.is_valid());
    assert_eq!(ServerCredentials::FIELD_NAMES.len(), 4);
}

#[test]
fn cleanup_flag_skips_startup() {
    assert!(StartupFlags { autostart: true, cleanup: false }.proceeds_to_startup());
    assert!(!StartupFlags { autostart: true, cleanup: true }.proceeds_to_startup());
}

#[test]
fn visibility_policy_table() {
    assert_eq!(VisibilityPolicy::AlwaysShowOnStartup.decide(false), InitialVisibility::ShowOnStartup);
    assert_eq!(VisibilityPolicy::AlwaysShowOnStartup.decide(true), InitialVisibility::ShowOnStartup);
    assert_eq!(VisibilityPolicy::FollowAutostartFlag.decide(true), InitialVisibility::ShowOnStartup);
    assert_eq!(VisibilityPolicy::FollowAutostartFlag.decide(false), InitialVisibility::Show);
}

#[test]
fn exit_status_codes() {
    assert_eq!(ExitStatus::SUCCESS.code(), 0);
    assert_eq!(ExitStatus::LOAD_FAILURE.code(), -1);
    assert_eq!(ExitStatus::FAILURE.code(), 1);
    assert!(!ExitStatus::from_code(-1).is_success());
}
