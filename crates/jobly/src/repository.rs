//! Job repository: create, search, fetch, partial update and delete.
//!
//! Every operation is a standalone unit of work against the given client; none
//! opens a transaction. Pass a `Transaction` as `conn` to group calls.

use crate::client::GenericClient;
use crate::error::{StoreError, StoreResult};
use crate::filter::{JobFilter, build_where};
use crate::model::{Company, Job, JobDetail, JobListing, JobUpdate, NewJob};
use crate::patch::{Patch, TranslationTable, sql_for_partial_update};
use crate::row::FromRow;
use crate::value::params_ref;
use tokio_postgres::types::ToSql;

/// Columns returned for a [`Job`].
const JOB_RETURNING: &str = "id, title, salary, equity, company_handle";

const INSERT_SQL: &str = "INSERT INTO jobs (title, salary, equity, company_handle) \
     VALUES ($1, $2, $3, $4) \
     RETURNING id, title, salary, equity, company_handle";

const FIND_ALL_SQL: &str = "SELECT j.id, j.title, j.salary, j.equity, j.company_handle, \
     c.name AS company_name \
     FROM jobs AS j \
     LEFT JOIN companies AS c ON c.handle = j.company_handle";

const GET_SQL: &str = "SELECT id, title, salary, equity, company_handle FROM jobs WHERE id = $1";

const COMPANY_SQL: &str = "SELECT handle, name, description, num_employees, logo_url \
     FROM companies WHERE handle = $1";

const DELETE_SQL: &str = "DELETE FROM jobs WHERE id = $1 RETURNING id";

/// Job fields already match their column names.
const JOB_COLUMNS: TranslationTable = TranslationTable::EMPTY;

/// Columns a patch may never touch.
const IMMUTABLE_COLUMNS: &[&str] = &["id", "company_handle"];

fn no_job(id: i32) -> StoreError {
    tracing::debug!(target: "jobly.jobs", id, "job not found");
    StoreError::not_found(format!("no job found: {id}"))
}

/// Data access for the `jobs` table.
pub struct JobRepository;

impl JobRepository {
    /// Insert a job and return it with its generated id.
    ///
    /// No validation beyond the table's constraints; an unknown company handle
    /// surfaces as a foreign key violation in [`StoreError::Query`].
    pub async fn create(conn: &impl GenericClient, data: &NewJob) -> StoreResult<Job> {
        let params: [&(dyn ToSql + Sync); 4] = [
            &data.title,
            &data.salary,
            &data.equity,
            &data.company_handle,
        ];
        let row = conn.query_one_tagged("jobs.create", INSERT_SQL, &params).await?;
        Job::from_row(&row)
    }

    /// All jobs matching `filter`, ordered by title, with their company name.
    pub async fn find_all(
        conn: &impl GenericClient,
        filter: &JobFilter,
    ) -> StoreResult<Vec<JobListing>> {
        let clause = build_where(filter);
        let sql = format!("{FIND_ALL_SQL}{} ORDER BY j.title", clause.to_sql());
        let params = params_ref(&clause.params);

        let rows = conn.query_tagged("jobs.find_all", &sql, &params).await?;
        rows.iter().map(JobListing::from_row).collect()
    }

    /// One job by id, with its company nested.
    ///
    /// The job and its company are read with two separate statements and no
    /// transaction; the company may change (or vanish) between them.
    pub async fn get(conn: &impl GenericClient, id: i32) -> StoreResult<JobDetail> {
        let job = match conn.query_opt_tagged("jobs.get", GET_SQL, &[&id]).await? {
            Some(row) => Job::from_row(&row)?,
            None => return Err(no_job(id)),
        };

        let company = Self::company_of(conn, &job).await?;
        Ok(JobDetail::from_parts(job, company))
    }

    /// The company `job` belongs to, if it still exists.
    async fn company_of(conn: &impl GenericClient, job: &Job) -> StoreResult<Option<Company>> {
        conn.query_opt_tagged("jobs.get.company", COMPANY_SQL, &[&job.company_handle])
            .await?
            .map(|row| Company::from_row(&row))
            .transpose()
    }

    /// Apply the fields of `data` that are set to job `id`.
    ///
    /// Fails with [`StoreError::InvalidPatch`] before touching the database if
    /// no field is set.
    pub async fn update(conn: &impl GenericClient, id: i32, data: &JobUpdate) -> StoreResult<Job> {
        Self::update_patch(conn, id, &data.to_patch()).await
    }

    /// Apply an explicit patch to job `id`.
    ///
    /// `id` and `company_handle` cannot be patched.
    pub async fn update_patch(conn: &impl GenericClient, id: i32, patch: &Patch) -> StoreResult<Job> {
        if let Some((field, _)) = patch
            .iter()
            .find(|(field, _)| {
                let column = JOB_COLUMNS.resolve(field);
                IMMUTABLE_COLUMNS.iter().any(|immutable| *immutable == column)
            })
        {
            return Err(StoreError::invalid_patch(format!(
                "field '{field}' cannot be updated"
            )));
        }

        let set = sql_for_partial_update(patch, &JOB_COLUMNS)?;
        let sql = format!(
            "UPDATE jobs SET {} WHERE id = ${} RETURNING {JOB_RETURNING}",
            set.set_cols,
            set.next_placeholder()
        );
        let mut params = params_ref(&set.values);
        params.push(&id);

        match conn.query_opt_tagged("jobs.update", &sql, &params).await? {
            Some(row) => Job::from_row(&row),
            None => Err(no_job(id)),
        }
    }

    /// Delete job `id`.
    pub async fn remove(conn: &impl GenericClient, id: i32) -> StoreResult<()> {
        match conn.query_opt_tagged("jobs.remove", DELETE_SQL, &[&id]).await? {
            Some(_) => Ok(()),
            None => Err(no_job(id)),
        }
    }
}
