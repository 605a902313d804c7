use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn menu_display(session: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("menu-display").unwrap();
    cmd.env_remove("MENU_API_URL")
        .env_remove("MENU_API_BASE")
        .env_remove("RUST_LOG")
        .env("MENU_SESSION_FILE", session.path().join("session.json"));
    cmd
}

#[test]
fn test_auth_import_status_logout() {
    let dir = TempDir::new().unwrap();

    menu_display(&dir)
        .args(["auth", "import", "--access-token", "access-token-1234", "--refresh-token", "R1"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Credentials stored"));

    let stored: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("session.json")).unwrap()).unwrap();
    assert_eq!(stored["token"], "access-token-1234");
    assert_eq!(stored["refreshToken"], "R1");

    menu_display(&dir)
        .args(["auth", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("********1234"))
        .stdout(predicate::str::contains("stored"));

    menu_display(&dir)
        .args(["auth", "logout"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Signed out"));

    menu_display(&dir)
        .args(["auth", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not signed in"));
}

#[test]
fn test_import_rejects_invalid_user_profile() {
    let dir = TempDir::new().unwrap();

    menu_display(&dir)
        .args(["auth", "import", "--access-token", "A1", "--user", "{not json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not valid JSON"));
}

#[test]
fn test_menu_from_file_as_json() {
    let dir = TempDir::new().unwrap();
    let catalog = dir.path().join("products.json");
    fs::write(
        &catalog,
        r#"{"items": [
            {"_id": "1", "name": "Latte", "price": 25000, "category": "Coffee"},
            {"_id": "2", "name": "Iced Latte", "price": "27000", "category": " coffee "},
            {"_id": "3", "name": "Cheeseburger", "price": 45000, "category": "Burger"},
            {"_id": "4", "name": "Croissant", "price": 18000, "category": "Patisserie"}
        ]}"#,
    )
    .unwrap();

    let output = menu_display(&dir)
        .args(["menu", "--json", "--search", "ice", "--from-file"])
        .arg(&catalog)
        .output()
        .unwrap();
    assert!(output.status.success());

    let menu: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(menu["selected"], "Coffee");
    assert_eq!(
        menu["chips"],
        serde_json::json!(["All", "Coffee", "Burger", "Patisserie"])
    );
    assert_eq!(menu["products"].as_array().unwrap().len(), 1);
    assert_eq!(menu["products"][0]["name"], "Iced Latte");
    assert_eq!(menu["products"][0]["price"], "Rp\u{a0}27.000,00");
}

#[test]
fn test_menu_empty_state_in_json() {
    let dir = TempDir::new().unwrap();
    let catalog = dir.path().join("products.json");
    fs::write(&catalog, r#"[{"_id": "1", "name": "Latte", "category": "Coffee"}]"#).unwrap();

    menu_display(&dir)
        .args(["menu", "--json", "--category", "Coffee", "--search", "tea", "--from-file"])
        .arg(&catalog)
        .assert()
        .success()
        .stdout(predicate::str::contains("No products in \u{201c}Coffee\u{201d}"));
}

#[test]
fn test_missing_config_file_is_config_error() {
    let dir = TempDir::new().unwrap();

    menu_display(&dir)
        .args(["--config", "does-not-exist.toml", "auth", "status"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Error:"));
}
