//! Repository round trips against a live database.
//!
//! Skipped unless `DATABASE_URL` is set. Each test works in its own schema,
//! dropped when the test ends, pass or fail.

use jobly::{
    GenericClient, JobFilter, JobRepository, JobUpdate, NewJob, Patch, StoreError, StoreResult,
    TracingClient,
};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio_postgres::{Client, NoTls};

const SCHEMA_SQL: &str = "
CREATE TABLE companies (
    handle VARCHAR(25) PRIMARY KEY CHECK (handle = lower(handle)),
    name TEXT UNIQUE NOT NULL,
    num_employees INTEGER CHECK (num_employees >= 0),
    description TEXT NOT NULL,
    logo_url TEXT
);
CREATE TABLE jobs (
    id SERIAL PRIMARY KEY,
    title TEXT NOT NULL,
    salary INTEGER CHECK (salary >= 0),
    equity NUMERIC CHECK (equity <= 1.0),
    company_handle VARCHAR(25) NOT NULL REFERENCES companies ON DELETE CASCADE
);
INSERT INTO companies (handle, name, num_employees, description, logo_url)
VALUES ('acme', 'Acme', 10, 'Rockets', 'http://acme.img'),
       ('globex', 'Globex', 500, 'Everything', NULL);
";

/// A per-test schema, dropped over a fresh connection when this goes out of
/// scope (including while unwinding from a failed assertion).
struct TestSchema {
    database_url: String,
    name: String,
}

impl Drop for TestSchema {
    fn drop(&mut self) {
        let database_url = self.database_url.clone();
        let sql = format!("DROP SCHEMA IF EXISTS {} CASCADE", self.name);
        // Drop cannot await; run the statement on a runtime of its own.
        let _ = std::thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .ok()?;
            rt.block_on(async {
                let (client, connection) = tokio_postgres::connect(&database_url, NoTls).await.ok()?;
                tokio::spawn(connection);
                client.batch_execute(&sql).await.ok()
            })
        })
        .join();
    }
}

async fn connect() -> StoreResult<Option<(Client, TestSchema)>> {
    let _ = dotenvy::dotenv();
    let database_url = match std::env::var("DATABASE_URL") {
        Ok(v) => v,
        Err(_) => {
            eprintln!("DATABASE_URL is not set; skipping");
            return Ok(None);
        }
    };

    let (client, connection) = tokio_postgres::connect(&database_url, NoTls).await?;
    tokio::spawn(async move {
        let _ = connection.await;
    });

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before UNIX_EPOCH")
        .as_nanos();
    let schema = TestSchema {
        name: format!("jobly_test_{}_{}", std::process::id(), nanos),
        database_url,
    };
    client
        .batch_execute(&format!(
            "CREATE SCHEMA {name}; SET search_path TO {name}; {SCHEMA_SQL}",
            name = schema.name
        ))
        .await?;
    Ok(Some((client, schema)))
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

#[tokio::test]
async fn create_then_get_nests_company() -> StoreResult<()> {
    let Some((client, _schema)) = connect().await? else {
        return Ok(());
    };

    let new_job = NewJob::new("Dev", "acme").salary(100000).equity(dec("0.05"));
    let job = JobRepository::create(&client, &new_job).await?;
    assert_eq!(job.title, "Dev");
    assert_eq!(job.company_handle, "acme");

    let detail = JobRepository::get(&client, job.id).await?;
    assert_eq!(detail.id, job.id);
    assert_eq!(detail.salary, Some(100000));
    assert_eq!(detail.equity, Some(dec("0.05")));
    let company = detail.company.as_ref().expect("company");
    assert_eq!(company.handle, "acme");
    assert_eq!(company.num_employees, Some(10));

    let json = serde_json::to_value(&detail).unwrap();
    assert!(json.get("companyHandle").is_none());
    assert_eq!(json["company"]["logoUrl"], "http://acme.img");

    Ok(())
}

#[tokio::test]
async fn find_all_filters_and_orders() -> StoreResult<()> {
    let Some((client, _schema)) = connect().await? else {
        return Ok(());
    };

    for (title, salary, equity, handle) in [
        ("Engineer II", Some(120000), Some("0"), "acme"),
        ("Accountant", Some(60000), None, "globex"),
        ("Engineer I", Some(90000), Some("0.1"), "globex"),
        ("Manager", None, Some("0.2"), "acme"),
    ] {
        let mut job = NewJob::new(title, handle);
        job.salary = salary;
        job.equity = equity.map(dec);
        JobRepository::create(&client, &job).await?;
    }

    let all = JobRepository::find_all(&client, &JobFilter::new()).await?;
    assert_eq!(all.len(), 4);
    let mut sorted: Vec<_> = all.iter().map(|j| j.title.clone()).collect();
    sorted.sort();
    assert_eq!(
        all.iter().map(|j| j.title.clone()).collect::<Vec<_>>(),
        sorted
    );

    let engineers = JobRepository::find_all(&client, &JobFilter::new().title("engineer")).await?;
    assert_eq!(engineers.len(), 2);

    let with_equity = JobRepository::find_all(&client, &JobFilter::new().has_equity(true)).await?;
    let titles: Vec<_> = with_equity.iter().map(|j| j.title.as_str()).collect();
    assert_eq!(titles, vec!["Engineer I", "Manager"]);

    // has_equity=false does not filter.
    let any_equity = JobRepository::find_all(&client, &JobFilter::new().has_equity(false)).await?;
    assert_eq!(any_equity.len(), 4);

    let combined = JobRepository::find_all(
        &client,
        &JobFilter::new().min_salary(0).has_equity(true).title("Eng"),
    )
    .await?;
    assert_eq!(combined.len(), 1);
    assert_eq!(combined[0].title, "Engineer I");
    assert_eq!(combined[0].company_name.as_deref(), Some("Globex"));

    Ok(())
}

#[tokio::test]
async fn update_and_remove() -> StoreResult<()> {
    let Some((client, _schema)) = connect().await? else {
        return Ok(());
    };
    let client = TracingClient::new(client);

    let job = JobRepository::create(&client, &NewJob::new("Dev", "acme")).await?;

    let updated = JobRepository::update(
        &client,
        job.id,
        &JobUpdate::new().salary(90000).equity(dec("0.1")),
    )
    .await?;
    assert_eq!(updated.title, "Dev");
    assert_eq!(updated.salary, Some(90000));
    assert_eq!(updated.equity, Some(dec("0.1")));

    let patch = Patch::new().with("title", "Senior Dev");
    let renamed = JobRepository::update_patch(&client, job.id, &patch).await?;
    assert_eq!(renamed.title, "Senior Dev");
    assert_eq!(renamed.salary, Some(90000));

    let cleared = JobRepository::update(&client, job.id, &JobUpdate::new().clear_salary()).await?;
    assert_eq!(cleared.salary, None);
    assert_eq!(cleared.equity, Some(dec("0.1")));

    let from_json: JobUpdate = serde_json::from_str(r#"{"equity": null}"#).unwrap();
    let cleared = JobRepository::update(&client, job.id, &from_json).await?;
    assert_eq!(cleared.equity, None);
    assert_eq!(cleared.title, "Senior Dev");

    let err = JobRepository::update(&client, job.id + 1000, &JobUpdate::new().salary(1))
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    JobRepository::remove(&client, job.id).await?;
    let err = JobRepository::remove(&client, job.id).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
    let err = JobRepository::get(&client, job.id).await.unwrap_err();
    assert!(err.is_not_found());

    Ok(())
}

#[tokio::test]
async fn storage_failures_pass_through() -> StoreResult<()> {
    let Some((client, _schema)) = connect().await? else {
        return Ok(());
    };

    let err = JobRepository::create(&client, &NewJob::new("Dev", "nope"))
        .await
        .unwrap_err();
    assert!(err.is_foreign_key_violation());
    assert!(!err.is_not_found());

    let job = JobRepository::create(&client, &NewJob::new("Dev", "acme")).await?;
    let err = JobRepository::update(&client, job.id, &JobUpdate::new().equity(dec("1.5")))
        .await
        .unwrap_err();
    assert!(err.is_check_violation());

    // The failed update left the row as it was.
    let row = GenericClient::query_one(&client, "SELECT equity FROM jobs WHERE id = $1", &[&job.id]).await?;
    assert_eq!(row.get::<_, Option<Decimal>>("equity"), None);

    Ok(())
}
