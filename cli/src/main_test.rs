use super::*;

#[test]
fn parses_access_check() {
    let cli = Cli::try_parse_from(["clinic-cli", "access", "check", "--role", "Staff", "--feature", "medical-records"])
        .unwrap();
    let Command::Access(AccessCommand { command: AccessSubcommand::Check { role, feature } }) = cli.command else {
        panic!("expected access check");
    };
    assert_eq!(role, Role::Staff);
    assert_eq!(feature, Feature::MedicalRecords);
}

#[test]
fn rejects_unknown_role() {
    assert!(Cli::try_parse_from(["clinic-cli", "access", "dashboard", "--role", "Janitor"]).is_err());
}

#[test]
fn appointments_status_defaults_to_all() {
    let cli = Cli::try_parse_from(["clinic-cli", "appointments", "--search", "emily"]).unwrap();
    let Command::Appointments(args) = cli.command else {
        panic!("expected appointments");
    };
    assert_eq!(args.status, StatusFilter::All);
    assert_eq!(args.search, "emily");
}

#[test]
fn nav_json_reports_active_item() {
    let json = nav_json(Role::Staff, Some("/clinic/doctors/12"));
    assert_eq!(json["panel"], "clinic");
    assert_eq!(json["items"][0]["path"], "/staff/dashboard");
    assert_eq!(json["active"], "Doctors");
}

#[test]
fn classify_json_reads_body() {
    let json = classify_json(503, Some(r#"{"message":"down","code":"SERVICE_UNAVAILABLE"}"#)).unwrap();
    assert_eq!(json["error"]["message"], "down");
    assert_eq!(json["kind"], "server");
    assert_eq!(json["retryable"], true);
    assert_eq!(json["auth"], false);
}

#[test]
fn classify_json_status_zero_is_network() {
    let json = classify_json(0, None).unwrap();
    assert_eq!(json["kind"], "network");
    assert_eq!(json["retryable"], false);
}

#[test]
fn classify_json_rejects_bad_body() {
    assert!(matches!(classify_json(400, Some("{not json")), Err(CliError::InvalidJson(_))));
}

#[test]
fn inspect_json_reports_expiry() {
    // {"exp":1000,"role":"Doctor"}
    let token = "h.eyJleHAiOjEwMDAsInJvbGUiOiJEb2N0b3IifQ.s";
    let json = inspect_json(token, 1001).unwrap();
    assert_eq!(json["exp"], 1000);
    assert_eq!(json["role"], "Doctor");
    assert_eq!(json["expires_at_ms"], 1_000_000);
    assert_eq!(json["expired"], true);
    assert!(matches!(inspect_json("garbage", 0), Err(CliError::Token(_))));
}
