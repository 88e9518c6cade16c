use fxconv::cli::interactive;
use fxconv::core::Converter;
use fxconv::providers::FixedRateSource;
use fxconv::store::{self, MemoryHistoryStore};
use std::sync::Arc;
use tracing::info;

mod test_utils {
    use wiremock::matchers::{method, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Serves `/{any key}/pair/USD/{target}` with the given rate, and
    /// `unsupported-code` for every other target.
    pub async fn create_mock_server(rates: &[(&str, f64)]) -> MockServer {
        let mock_server = MockServer::start().await;

        for (target, rate) in rates {
            Mock::given(method("GET"))
                .and(path_regex(format!("^/[^/]+/pair/USD/{target}$")))
                .respond_with(ResponseTemplate::new(200).set_body_string(format!(
                    r#"{{"result": "success", "base_code": "USD", "target_code": "{target}", "conversion_rate": {rate}}}"#
                )))
                .with_priority(1)
                .mount(&mock_server)
                .await;
        }

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string(
                r#"{"result": "error", "error-type": "unsupported-code"}"#,
            ))
            .with_priority(10)
            .mount(&mock_server)
            .await;

        mock_server
    }

    pub fn write_config(dir: &std::path::Path, base_url: &str) -> std::path::PathBuf {
        let config_path = dir.join("config.yaml");
        let config_content = format!(
            r#"
providers:
  exchange_rate:
    base_url: "{}"
    timeout_secs: 5
    api_key: "integration-key"
data_path: "{}"
"#,
            base_url,
            dir.join("data").display()
        );
        std::fs::write(&config_path, config_content).expect("Failed to write config file");
        config_path
    }
}

async fn run_session(input: &str) -> (String, Arc<FixedRateSource>, MemoryHistoryStore) {
    let source = Arc::new(FixedRateSource::new([
        ("USD", 1.0),
        ("INR", 83.0),
        ("EUR", 0.92),
    ]));
    let converter = Converter::new(source.clone());
    let history = MemoryHistoryStore::new();
    let mut out = Vec::new();

    interactive::run(input.as_bytes(), &mut out, &converter, &history)
        .await
        .expect("Interactive session failed");

    let out = String::from_utf8(out).expect("Output is not UTF-8");
    info!(%out, "Session output");
    (out, source, history)
}

#[test_log::test(tokio::test)]
async fn test_interactive_conversion_is_printed_and_recorded() {
    let (out, source, history) = run_session("150\nusd\ninr\n0\n").await;

    assert!(out.contains("Enter amount (0 to exit): "));
    assert!(out.contains("150.00 USD = 12450.00 INR"));
    assert_eq!(source.lookups(), 2);

    let records = history.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].amount, 150.0);
    assert_eq!(records[0].source.as_str(), "USD");
    assert_eq!(records[0].target.as_str(), "INR");
    assert!((records[0].result - 12450.0).abs() < 1e-9);
}

#[test_log::test(tokio::test)]
async fn test_zero_amount_ends_session_without_lookups() {
    let (out, source, history) = run_session("0\n150 USD INR\n").await;

    assert!(!out.contains("Result:"));
    assert_eq!(source.lookups(), 0);
    assert!(history.records().is_empty());
}

#[test_log::test(tokio::test)]
async fn test_unknown_currency_does_not_end_session() {
    let (out, _, history) = run_session("10 USD XYZ\n92 eur inr\n0\n").await;

    assert!(out.contains("Real-time rate unavailable for: XYZ"));
    assert!(out.contains("92.00 EUR = 8300.00 INR"));

    let records = history.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].source.as_str(), "EUR");
}

#[test_log::test(tokio::test)]
async fn test_end_of_input_ends_session() {
    let (out, _, history) = run_session("5 USD INR\n").await;

    assert!(out.contains("5.00 USD = 415.00 INR"));
    assert_eq!(history.records().len(), 1);
}

#[test_log::test(tokio::test)]
async fn test_one_shot_conversion_with_mock_provider() {
    let mock_server = test_utils::create_mock_server(&[("USD", 1.0), ("INR", 83.0)]).await;
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(dir.path(), &mock_server.uri());

    let result = fxconv::run_command(
        fxconv::AppCommand::Convert {
            amount: "150".to_string(),
            from: "usd".to_string(),
            to: "inr".to_string(),
        },
        Some(config_path.to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Main function failed with: {:?}",
        result.err()
    );

    let history = store::initialize(&dir.path().join("data")).expect("Failed to reopen history");
    let records = history.records().expect("Failed to read history");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].source.as_str(), "USD");
    assert_eq!(records[0].target.as_str(), "INR");
    assert!((records[0].result - 12450.0).abs() < 1e-9);
}

#[test_log::test(tokio::test)]
async fn test_one_shot_unsupported_currency_fails() {
    let mock_server = test_utils::create_mock_server(&[("USD", 1.0)]).await;
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(dir.path(), &mock_server.uri());

    let result = fxconv::run_command(
        fxconv::AppCommand::Convert {
            amount: "10".to_string(),
            from: "USD".to_string(),
            to: "ABC".to_string(),
        },
        Some(config_path.to_str().unwrap()),
    )
    .await;

    let err = result.expect_err("Conversion should fail");
    assert_eq!(err.to_string(), "Real-time rate unavailable for: ABC");

    let history = store::initialize(&dir.path().join("data")).expect("Failed to reopen history");
    assert!(history.records().expect("Failed to read history").is_empty());
}

#[test_log::test(tokio::test)]
async fn test_one_shot_rejects_invalid_amount() {
    let mock_server = test_utils::create_mock_server(&[("USD", 1.0)]).await;
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(dir.path(), &mock_server.uri());

    let result = fxconv::run_command(
        fxconv::AppCommand::Convert {
            amount: "ten".to_string(),
            from: "USD".to_string(),
            to: "USD".to_string(),
        },
        Some(config_path.to_str().unwrap()),
    )
    .await;

    assert_eq!(result.unwrap_err().to_string(), "Invalid amount: ten");
    let requests = mock_server.received_requests().await.unwrap_or_default();
    assert!(requests.is_empty());
}

#[test_log::test(tokio::test)]
async fn test_missing_config_file_fails() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let missing = dir.path().join("missing.yaml");

    let result = fxconv::run_command(
        fxconv::AppCommand::Interactive,
        Some(missing.to_str().unwrap()),
    )
    .await;
    assert!(result.unwrap_err().to_string().contains("Failed to read config file"));
}
