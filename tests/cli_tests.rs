mod support;

use assert_cmd::Command;
use predicates::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;

use support::files::{Workspace, GOLF_RULES};
use support::http_stub::StubServer;

const MEMORY_CONFIG: &str = r#"
database = ":memory:"

[alerts]
profit_threshold = 12
recipient = "+447700900123"
"#;

fn flipper(workspace: &Workspace) -> Command {
    let mut cmd = Command::cargo_bin("flipper").expect("flipper binary");
    cmd.current_dir(workspace.path(""))
        .arg("--config")
        .arg(workspace.config_path())
        .arg("--color")
        .arg("never")
        .env_remove("EBAY_OAUTH_TOKEN")
        .env_remove("WHATSAPP_ACCESS_TOKEN")
        .env_remove("WHATSAPP_PHONE_NUMBER_ID")
        .env_remove("WHATSAPP_TO_MSISDN")
        .env_remove("VINTED_COOKIE");
    cmd
}

fn json_line(stdout: &[u8]) -> serde_json::Value {
    let text = String::from_utf8_lossy(stdout);
    let line = text.lines().last().expect("json output line");
    serde_json::from_str(line).expect("valid json output")
}

fn decimal(value: &serde_json::Value) -> Decimal {
    value
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(|| value.to_string())
        .parse()
        .expect("decimal value")
}

#[test]
fn help_lists_commands() {
    Command::cargo_bin("flipper")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("check-config"))
        .stdout(predicate::str::contains("test-alert"))
        .stdout(predicate::str::contains("evaluate"));
}

#[test]
fn check_config_accepts_valid_files_and_warns_about_secrets() {
    let workspace = Workspace::new(MEMORY_CONFIG, GOLF_RULES);

    flipper(&workspace)
        .arg("check-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration valid (3 rules)"))
        .stdout(predicate::str::contains("WHATSAPP_ACCESS_TOKEN is not set"));
}

#[test]
fn check_config_reports_invalid_values() {
    let workspace = Workspace::new(
        "[scheduler]\ninterval_secs = 0\n",
        GOLF_RULES,
    );

    flipper(&workspace)
        .arg("check-config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("scheduler.interval_secs"));
}

#[test]
fn check_config_rejects_rules_without_default() {
    let rules = "[[rules]]\nmatch = \"brand\"\nvalue = \"Ping\"\nresale = { multiplier = 1.4 }\n";
    let workspace = Workspace::new(MEMORY_CONFIG, rules);

    flipper(&workspace)
        .arg("check-config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no default rule"));
}

#[test]
fn missing_config_file_fails() {
    let workspace = Workspace::new(MEMORY_CONFIG, GOLF_RULES);

    Command::cargo_bin("flipper")
        .unwrap()
        .arg("--config")
        .arg(workspace.path("absent.toml"))
        .arg("check-config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read config file"));
}

#[test]
fn evaluate_scores_the_m6_driver() {
    let workspace = Workspace::new(MEMORY_CONFIG, GOLF_RULES);

    let output = flipper(&workspace)
        .args(["--json", "evaluate", "--shipping", "5", "--id", "m6"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value = json_line(&output.stdout);
    assert_eq!(value["type"], "evaluation");
    let payload = &value["payload"];
    assert_eq!(decimal(&payload["evaluation"]["acquisition_cost"]), dec!(85));
    assert_eq!(decimal(&payload["evaluation"]["profit"]), dec!(65));
    assert_eq!(payload["evaluation"]["matched_rule_kind"], "model");
    assert_eq!(payload["listing"]["extracted_brand"], "TaylorMade");
    assert_eq!(payload["qualifies"], true);
}

#[test]
fn evaluate_human_output_names_the_rule() {
    let workspace = Workspace::new(MEMORY_CONFIG, GOLF_RULES);

    flipper(&workspace)
        .args(["evaluate", "--title", "Ping G425 Driver", "--price", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ping G425 Driver"))
        .stdout(predicate::str::contains("default"))
        .stdout(predicate::str::contains("£50.00"));
}

#[test]
fn evaluate_rejects_zero_price() {
    let workspace = Workspace::new(MEMORY_CONFIG, GOLF_RULES);

    flipper(&workspace)
        .args(["evaluate", "--price", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("price"));
}

#[test]
fn status_reports_missing_database() {
    let config = "database = \"never-created.db\"\n";
    let workspace = Workspace::new(config, GOLF_RULES);

    let output = flipper(&workspace)
        .args(["--json", "status"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value = json_line(&output.stdout);
    assert_eq!(value["payload"]["status"], "missing_database");
}

#[test]
fn test_alert_without_token_fails() {
    let config = r#"
database = ":memory:"

[alerts]
recipient = "+447700900123"

[whatsapp]
phone_number_id = "10987654321"
"#;
    let workspace = Workspace::new(config, GOLF_RULES);

    flipper(&workspace)
        .arg("test-alert")
        .assert()
        .failure()
        .stderr(predicate::str::contains("WHATSAPP_ACCESS_TOKEN"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_alert_is_delivered_through_whatsapp() {
    let server = StubServer::json(200, json!({"messages": [{"id": "wamid.1"}]})).await;
    let config = format!(
        r#"
database = ":memory:"

[alerts]
profit_threshold = 1000
recipient = "+447700900123"

[whatsapp]
api_url = "{}"
phone_number_id = "10987654321"
"#,
        server.url()
    );
    let workspace = Workspace::new(&config, GOLF_RULES);

    let mut cmd = flipper(&workspace);
    cmd.env("WHATSAPP_ACCESS_TOKEN", "wa-token")
        .args(["test-alert", "--id", "smoke"]);
    let output = tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap();

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(String::from_utf8_lossy(&output.stdout).contains("Test alert delivered"));

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path(), "/10987654321/messages");
    assert!(requests[0].body.contains("New Flip Alert"));
}
