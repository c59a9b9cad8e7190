use bucket_loader::load::{load, LoadOptions};
use bucket_loader::load_config::load_config;
use bucket_loader::rows::load_rows;
use bucket_loader_core::asset::AssetPayload;
use bucket_loader_core::contract::{MockCatalogClient, SaveResponse};
use bucket_loader_core::error::CatalogError;
use std::fs::write;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

const CONFIG: &str = r#"
load:
  batch_size: 2
  delimiter: ";"
connections:
  - connector: s3
    connection: aws-prod
    qualified_name: default/s3/1672502400
  - connector: gcs
    connection: gcp-prod
    qualified_name: default/gcs/123
  - connector: adls
    connection: azure-prod
    qualified_name: default/adls/123
"#;

const ROWS: &str = "\
CONNECTOR,CONNECTION,ACCOUNT NAME,BUCKET NAME,BUCKET ARN,OBJECT NAME,DESCRIPTION,CLASSIFICATIONS
s3,aws-prod,,logs,arn:aws:s3:::logs,,Access logs,PII;Internal
s3,aws-prod,,logs,arn:aws:s3:::logs,2024/01/01.log,,
s3,aws-prod,,no-arn,,,Missing ARN,
gcs,gcp-prod,,my-bucket,,,Raw landing zone,
adls,azure-prod,acct1,container1,,,Lake,Confidential
adls,azure-prod,,orphan,,,No account,
gcs,unknown-connection,,lost,,,,
,gcp-prod,,no-connector,,,,
";

fn temp_file(contents: &str) -> NamedTempFile {
    let file = NamedTempFile::new().expect("temp file");
    write(file.path(), contents).unwrap();
    file
}

#[test]
fn test_load_rows_reads_csv_with_headers() {
    let rows_file = temp_file(ROWS);
    let rows = load_rows(rows_file.path()).expect("rows load");
    assert_eq!(rows.len(), 8);
    assert_eq!(rows[0]["BUCKET NAME"], "logs");
    assert_eq!(rows[0]["CLASSIFICATIONS"], "PII;Internal");
    assert_eq!(rows[4]["ACCOUNT NAME"], "acct1");
}

#[test]
fn test_load_rows_missing_file_fails() {
    assert!(load_rows("does/not/exist.csv").is_err());
}

#[tokio::test]
async fn test_load_upserts_valid_buckets_then_classifies() {
    let config_file = temp_file(CONFIG);
    let rows_file = temp_file(ROWS);
    let config = load_config(config_file.path()).expect("config");
    let rows = load_rows(rows_file.path()).expect("rows");
    let options = LoadOptions::from_config(&config);

    let calls: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let mut client = MockCatalogClient::new();

    let save_calls = calls.clone();
    client
        .expect_save_assets()
        .returning(move |assets: Vec<AssetPayload>| {
            let names: Vec<String> = assets
                .iter()
                .map(|a| a.qualified_name().to_string())
                .collect();
            save_calls
                .lock()
                .unwrap()
                .push(format!("save {}", names.join(" ")));
            Ok(SaveResponse {
                created: names,
                updated: vec![],
            })
        });

    client
        .expect_get_classifications()
        .returning(|_, _| Ok(vec![]));

    let append_calls = calls.clone();
    client
        .expect_append_classifications()
        .returning(move |type_name, qualified_name, names| {
            append_calls.lock().unwrap().push(format!(
                "classify {type_name} {qualified_name} {}",
                names.join(",")
            ));
            Ok(())
        });

    let report = load(&client, &config, &rows, &options)
        .await
        .expect("load succeeds");

    assert_eq!(report.submitted, 3);
    assert_eq!(report.skipped, 2);
    assert_eq!(report.classified, 2);
    assert_eq!(
        *calls.lock().unwrap(),
        vec![
            "save default/s3/1672502400/arn:aws:s3:::logs default/gcs/123/my-bucket".to_string(),
            "save default/adls/123/acct1/container1".to_string(),
            "classify S3Bucket default/s3/1672502400/arn:aws:s3:::logs PII,Internal".to_string(),
            "classify ADLSContainer default/adls/123/acct1/container1 Confidential".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_load_surfaces_catalog_failure() {
    let config_file = temp_file(CONFIG);
    let rows_file = temp_file(ROWS);
    let config = load_config(config_file.path()).expect("config");
    let rows = load_rows(rows_file.path()).expect("rows");

    let mut client = MockCatalogClient::new();
    client.expect_save_assets().returning(|_| {
        Err(CatalogError::Rejected {
            status: 403,
            message: "forbidden".into(),
        })
    });
    client.expect_get_classifications().never();
    client.expect_append_classifications().never();

    let err = load(&client, &config, &rows, &LoadOptions::from_config(&config))
        .await
        .expect_err("catalog failure should surface");
    assert!(format!("{err:#}").contains("403"), "unexpected error: {err:#}");
}
