use models::mapper::{domain_to_claim, domain_to_view, record_to_domain, ViewBatch};
use models::{ModelError, UserRecord};

const ROWS: &str = r#"[
    {"user_id": "1", "user_name": "Alice", "email_address": "alice@example.com", "created_at": "2024-03-05T09:30:00Z"},
    {"user_id": "2", "user_name": "Bob", "email_address": "bob@example.com", "created_at": "2024-04-01"},
    {"user_id": "3", "user_name": "Carol", "created_at": "2024-05-01"}
]"#;

#[test]
fn json_rows_flow_through_the_mapper() -> anyhow::Result<()> {
    let records: Vec<UserRecord> = serde_json::from_str(ROWS)?;
    let views: Vec<_> = ViewBatch::new(&records).iter().collect();
    assert_eq!(views.len(), records.len());

    let alice = views[0].as_ref().map_err(|e| anyhow::anyhow!(e.to_string()))?;
    assert_eq!(alice.id, "1");
    assert_eq!(alice.member_since, "March 5, 2024");

    let bob = views[1].as_ref().map_err(|e| anyhow::anyhow!(e.to_string()))?;
    assert_eq!(bob.display_name, "Bob <bob@example.com>");

    assert_eq!(views[2], Err(ModelError::missing("email_address")));
    Ok(())
}

#[test]
fn claims_and_views_agree_on_identity() -> anyhow::Result<()> {
    let record = UserRecord::from_json(
        r#"{"user_id": "77", "user_name": "Dana", "email_address": "dana@example.com", "created_at": "2022-02-02T02:02:02.250Z"}"#,
    )?;
    let user = record_to_domain(&record)?;
    let view = domain_to_view(&user);
    let claims = domain_to_claim(&user);
    assert_eq!(view.id, claims.sub);
    assert_eq!(view.email, claims.email);
    assert_eq!(claims.sub, "77");
    Ok(())
}
