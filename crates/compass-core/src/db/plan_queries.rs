//! Plan CRUD operations and queries.

use std::str::FromStr;

use jiff::Timestamp;
use rusqlite::{params, types::Type, OptionalExtension, Row, ToSql};

use crate::{
    error::{CompassError, DatabaseResultExt, Result},
    models::{step_info, Plan, PlanFilter, WizardData, WizardUpdate},
    params::{CreatePlan, UpdatePlan},
};

const PLAN_COLUMNS: &str = "id, owner_id, status, approval_status, version_number, \
     last_saved_step, is_template, is_public, is_deleted, deleted_at, data, draft_data, \
     created_at, updated_at, submitted_at";

const INSERT_PLAN_SQL: &str = "INSERT INTO plans (owner_id, name_en, status, approval_status, \
     version_number, last_saved_step, is_template, is_public, data, draft_data, created_at, \
     updated_at, submitted_at) VALUES (?1, ?2, ?3, ?4, 1, ?5, ?6, ?7, ?8, ?9, ?10, ?10, ?11)";
const CHECK_PLAN_LIVE_SQL: &str = "SELECT is_deleted FROM plans WHERE id = ?1";
const SOFT_DELETE_PLAN_SQL: &str =
    "UPDATE plans SET is_deleted = 1, deleted_at = ?1, updated_at = ?1 WHERE id = ?2";
const RESTORE_PLAN_SQL: &str =
    "UPDATE plans SET is_deleted = 0, deleted_at = NULL, updated_at = ?1 WHERE id = ?2";

/// Converts a text column holding an enum into its typed form.
fn parse_column<T>(row: &Row<'_>, index: usize) -> rusqlite::Result<T>
where
    T: FromStr<Err = String>,
{
    let raw: String = row.get(index)?;
    raw.parse::<T>().map_err(|message| {
        rusqlite::Error::FromSqlConversionFailure(
            index,
            Type::Text,
            Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, message)),
        )
    })
}

fn timestamp_column(row: &Row<'_>, index: usize) -> rusqlite::Result<Timestamp> {
    row.get::<_, String>(index)?
        .parse::<Timestamp>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(e)))
}

fn optional_timestamp_column(row: &Row<'_>, index: usize) -> rusqlite::Result<Option<Timestamp>> {
    row.get::<_, Option<String>>(index)?
        .map(|raw| {
            raw.parse::<Timestamp>().map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(e))
            })
        })
        .transpose()
}

fn data_column(row: &Row<'_>, index: usize) -> rusqlite::Result<WizardData> {
    let raw: String = row.get(index)?;
    serde_json::from_str(&raw)
        .map_err(CompassError::from)
        .and_then(WizardData::from_value)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(e)))
}

fn draft_column(row: &Row<'_>, index: usize) -> rusqlite::Result<Option<WizardUpdate>> {
    row.get::<_, Option<String>>(index)?
        .map(|raw| {
            serde_json::from_str::<WizardUpdate>(&raw).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(e))
            })
        })
        .transpose()
}

fn plan_from_row(row: &Row<'_>) -> rusqlite::Result<Plan> {
    Ok(Plan {
        id: row.get::<_, i64>(0)? as u64,
        owner_id: row.get(1)?,
        status: parse_column(row, 2)?,
        approval_status: parse_column(row, 3)?,
        version_number: row.get(4)?,
        last_saved_step: row.get(5)?,
        is_template: row.get(6)?,
        is_public: row.get(7)?,
        is_deleted: row.get(8)?,
        deleted_at: optional_timestamp_column(row, 9)?,
        data: data_column(row, 10)?,
        draft_data: draft_column(row, 11)?,
        created_at: timestamp_column(row, 12)?,
        updated_at: timestamp_column(row, 13)?,
        submitted_at: optional_timestamp_column(row, 14)?,
    })
}

impl super::Database {
    /// Inserts a new plan at version 1.
    pub fn create_plan(&mut self, params: &CreatePlan) -> Result<Plan> {
        step_info(params.last_saved_step)?;

        let data_json = serde_json::to_string(&params.data)?;
        let draft_json = params
            .draft_data
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let now = Timestamp::now().to_string();
        let submitted_at = params.submitted.then(|| now.clone());

        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        tx.execute(
            INSERT_PLAN_SQL,
            params![
                params.owner_id,
                params.data.name_en,
                params.status.as_str(),
                params.approval_status.as_str(),
                params.last_saved_step,
                params.is_template,
                params.is_public,
                data_json,
                draft_json,
                now,
                submitted_at,
            ],
        )
        .db_context("Failed to insert plan")?;

        let id = tx.last_insert_rowid() as u64;
        tx.commit().db_context("Failed to commit transaction")?;

        self.get_plan(id)?.ok_or(CompassError::PlanNotFound { id })
    }

    /// Retrieves a plan by its ID, including soft-deleted plans.
    pub fn get_plan(&self, id: u64) -> Result<Option<Plan>> {
        let sql = format!("SELECT {PLAN_COLUMNS} FROM plans WHERE id = ?1");
        self.connection
            .query_row(&sql, params![id as i64], plan_from_row)
            .optional()
            .db_context("Failed to query plan")
    }

    /// Updates the columns named in `params` on a live (not deleted) plan.
    pub fn update_plan(&mut self, params: &UpdatePlan) -> Result<Plan> {
        if let Some(step) = params.last_saved_step {
            step_info(step)?;
        }

        let now = Timestamp::now().to_string();
        let mut assignments = vec!["updated_at = ?"];
        let mut values: Vec<Box<dyn ToSql>> = vec![Box::new(now.clone())];

        if let Some(ref data) = params.data {
            assignments.push("data = ?");
            values.push(Box::new(serde_json::to_string(data)?));
            assignments.push("name_en = ?");
            values.push(Box::new(data.name_en.clone()));
        }

        match &params.draft_data {
            Some(Some(draft)) => {
                assignments.push("draft_data = ?");
                values.push(Box::new(serde_json::to_string(draft)?));
            }
            Some(None) => assignments.push("draft_data = NULL"),
            None => {}
        }

        if let Some(step) = params.last_saved_step {
            assignments.push("last_saved_step = ?");
            values.push(Box::new(step));
        }

        if let Some(status) = params.status {
            assignments.push("status = ?");
            values.push(Box::new(status.as_str()));
        }

        if let Some(approval) = params.approval_status {
            assignments.push("approval_status = ?");
            values.push(Box::new(approval.as_str()));
        }

        if params.bump_version {
            assignments.push("version_number = version_number + 1");
        }

        if params.mark_submitted {
            assignments.push("submitted_at = ?");
            values.push(Box::new(now));
        }

        values.push(Box::new(params.id as i64));
        let sql = format!("UPDATE plans SET {} WHERE id = ?", assignments.join(", "));

        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let is_deleted: Option<bool> = tx
            .query_row(CHECK_PLAN_LIVE_SQL, params![params.id as i64], |row| row.get(0))
            .optional()
            .db_context("Failed to check plan existence")?;
        if is_deleted != Some(false) {
            return Err(CompassError::PlanNotFound { id: params.id });
        }

        let value_refs: Vec<&dyn ToSql> = values.iter().map(|b| &**b).collect();
        tx.execute(&sql, &value_refs[..])
            .db_context("Failed to update plan")?;
        tx.commit().db_context("Failed to commit transaction")?;

        self.get_plan(params.id)?
            .ok_or(CompassError::PlanNotFound { id: params.id })
    }

    /// Lists plans matching the filter, most recently updated first.
    pub fn list_plans(&self, filter: &PlanFilter) -> Result<Vec<Plan>> {
        let mut conditions: Vec<&str> = Vec::new();
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();

        if filter.only_deleted {
            conditions.push("is_deleted = 1");
        } else if !filter.include_deleted {
            conditions.push("is_deleted = 0");
        }

        if let Some(is_template) = filter.is_template {
            conditions.push("is_template = ?");
            values.push(Box::new(is_template));
        }

        if let Some(is_public) = filter.is_public {
            conditions.push("is_public = ?");
            values.push(Box::new(is_public));
        }

        if let Some(ref owner) = filter.owner_id {
            conditions.push("owner_id = ?");
            values.push(Box::new(owner.clone()));
        }

        if let Some(status) = filter.status {
            conditions.push("status = ?");
            values.push(Box::new(status.as_str()));
        }

        if let Some(ref name) = filter.name_contains {
            conditions.push("name_en LIKE ?");
            values.push(Box::new(format!("%{name}%")));
        }

        let mut sql = format!("SELECT {PLAN_COLUMNS} FROM plans");
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql.push_str(" ORDER BY updated_at DESC, id DESC");

        let mut stmt = self
            .connection
            .prepare(&sql)
            .db_context("Failed to prepare query")?;
        let value_refs: Vec<&dyn ToSql> = values.iter().map(|b| &**b).collect();

        let plans = stmt
            .query_map(&value_refs[..], plan_from_row)
            .db_context("Failed to query plans")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch plans");
        plans
    }

    /// Flags a plan as deleted and stamps `deleted_at`. Rows are never removed.
    pub fn soft_delete_plan(&mut self, id: u64) -> Result<Plan> {
        self.set_deleted(id, SOFT_DELETE_PLAN_SQL)
    }

    /// Clears the soft-delete flag.
    pub fn restore_plan(&mut self, id: u64) -> Result<Plan> {
        self.set_deleted(id, RESTORE_PLAN_SQL)
    }

    fn set_deleted(&mut self, id: u64, sql: &str) -> Result<Plan> {
        let now = Timestamp::now().to_string();
        let rows_affected = self
            .connection
            .execute(sql, params![now, id as i64])
            .db_context("Failed to update deletion flag")?;

        if rows_affected == 0 {
            return Err(CompassError::PlanNotFound { id });
        }

        self.get_plan(id)?.ok_or(CompassError::PlanNotFound { id })
    }
}
