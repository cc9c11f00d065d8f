use std::sync::Arc;
use std::time::Duration;

use dotenvy::dotenv;
use tracing::{error, info, warn};

use common::utils::logging::{init_logging, LogFormat};
use configs::AppConfig;
use models::mapper::{domain_to_claim, domain_to_view, ViewBatch};
use models::user::{User, UserRecord};
use service::auth::{TokenConfig, TokenIssuer};
use service::storage::json_snapshot::JsonSnapshotFile;
use service::{InMemoryUserRepository, ServiceError, UserService};

const SAMPLE_RECORDS: &str = r#"[
    {"user_id": "501", "user_name": "Grace", "email_address": "grace@example.com", "created_at": "2021-06-01T08:00:00Z"},
    {"user_id": "502", "user_name": "Linus", "email_address": "linus@example.com", "created_at": "2022-11-15"},
    {"user_id": "503", "user_name": "Ada", "created_at": "2023-01-01"}
]"#;

fn load_config() -> AppConfig {
    match AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(e) => {
            // 日志尚未初始化，直接输出到 stderr
            eprintln!("config invalid, using defaults: {e}");
            AppConfig::default()
        }
    }
}

fn print_json<T: serde::Serialize>(label: &str, value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{label}:\n{s}"),
        Err(e) => warn!(error = %e, label, "cannot render value"),
    }
}

fn print_users(label: &str, users: &[User]) {
    let views: Vec<_> = users.iter().map(domain_to_view).collect();
    print_json(label, &views);
}

async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let snapshot = cfg.store.snapshot_path.as_deref().map(JsonSnapshotFile::new);
    let repo = match &snapshot {
        Some(file) => file.open_repository(cfg.store.first_id).await?,
        None => InMemoryUserRepository::starting_at(cfg.store.first_id),
    }
    .with_latency(Duration::from_millis(cfg.store.latency_ms));
    let repo = Arc::new(repo);

    let mut svc = UserService::new(Arc::clone(&repo));
    if !cfg.auth.jwt_secret.is_empty() {
        let issuer = TokenIssuer::new(&TokenConfig { secret: cfg.auth.jwt_secret.clone(), ttl_secs: cfg.auth.token_ttl_secs })?;
        svc = svc.with_tokens(issuer);
    }

    // 注册示例用户；重复运行时快照里已有同名邮箱，视为正常结果
    let mut alice_id = None;
    for (name, email) in [("Alice", "alice@example.com"), ("Bob", "bob@example.com")] {
        match svc.register_user(name, email).await {
            Ok(user) => {
                if name == "Alice" { alice_id = Some(user.id.clone()); }
                print_json("registered", &domain_to_view(&user));
            }
            Err(e @ ServiceError::Duplicate(_)) => println!("skip {name}: {e}"),
            Err(e) => return Err(e.into()),
        }
    }

    match svc.register_user("Alice Again", "alice@example.com").await {
        Err(e) => println!("second registration refused (code {}): {e}", e.code()),
        Ok(user) => warn!(user_id = %user.id, "duplicate email was accepted"),
    }

    if let Some(id) = &alice_id {
        let renamed = svc.update_name(id, "Alice Liddell").await?;
        print_json("renamed", &domain_to_view(&renamed));
        print_json("claims", &domain_to_claim(&renamed));
        match svc.issue_token(id).await {
            Ok(token) => println!("token: {token}"),
            Err(e) => println!("no token issued: {e}"),
        }
    }

    if let Err(e) = svc.update_name("999", "Nobody").await {
        println!("rename of unknown user refused (code {}): {e}", e.code());
    }

    let records: Vec<UserRecord> = serde_json::from_str(SAMPLE_RECORDS)?;
    for (idx, view) in ViewBatch::new(&records).iter().enumerate() {
        match view {
            Ok(v) => print_json(&format!("imported[{idx}]"), &v),
            Err(e) => println!("imported[{idx}] rejected: {e}"),
        }
    }

    let all = svc.list_users(Default::default()).await?;
    print_users("all users", &all);
    if let Some(last) = all.last().filter(|u| Some(&u.id) != alice_id.as_ref()) {
        svc.remove_user(&last.id).await?;
        print_users("after removal", &svc.list_users(Default::default()).await?);
    }

    if let Some(file) = &snapshot {
        file.persist(&repo).await?;
        info!(path = %file.path().display(), "snapshot written");
    }
    Ok(())
}

fn main() -> std::process::ExitCode {
    dotenv().ok();
    let cfg = load_config();
    let format = cfg.logging.format.parse::<LogFormat>().unwrap_or_default();
    init_logging(format, &cfg.logging.filter);
    info!(service = "catalog-demo", event = "start", version = env!("CARGO_PKG_VERSION"), "demo starting");

    let rt = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "catalog-demo", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return std::process::ExitCode::FAILURE;
        }
    };

    match rt.block_on(run(cfg)) {
        Ok(()) => {
            info!(service = "catalog-demo", event = "stop", "demo finished");
            std::process::ExitCode::SUCCESS
        }
        Err(e) => {
            error!(service = "catalog-demo", event = "run_failed", error = %e, "demo failed");
            std::process::ExitCode::FAILURE
        }
    }
}
