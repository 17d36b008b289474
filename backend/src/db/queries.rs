//! # Database Queries
//!
//! This module contains all the SQL for interacting with PostgreSQL.
//! Each function performs a specific database operation.
//!
//! ## Query Organization
//!
//! Queries are grouped by the table they operate on:
//! - `camp_*` / `*_camp*` - Camp table operations
//! - `talk_*` - Talk table operations (joined with speakers)
//! - `speaker_*` - Speaker table operations
//!
//! ## Error Handling
//!
//! All queries return `Result<T, DatabaseError>`. Common errors:
//! - `Conflict` - Unique constraint violated (duplicate moniker)
//! - `Rejected` - Check/not-null constraint violated
//! - `QueryError` - SQL execution failed

use std::collections::HashMap;

use chrono::NaiveDate;
use deadpool_postgres::{Object, Pool, Transaction};
use tokio_postgres::Row;
use tracing::{debug, info};

use super::models::*;
use super::DatabaseError;

/// Column list shared by every camp query, in `row_to_camp` order.
macro_rules! camp_columns {
    () => {
        "camp_id, moniker, name, event_date, length, \
         venue_name, address1, address2, address3, \
         city_town, state_province, postal_code, country"
    };
}

// ============================================
// HELPER FUNCTIONS
// ============================================

/// Check out a pooled connection.
async fn client(pool: &Pool) -> Result<Object, DatabaseError> {
    pool.get().await
        .map_err(|e| DatabaseError::ConnectionError(e.to_string()))
}

/// Helper to convert a database row to a Camp (without talks)
fn row_to_camp(row: &Row) -> Camp {
    Camp {
        camp_id: row.get("camp_id"),
        name: row.get("name"),
        moniker: row.get("moniker"),
        event_date: row.get("event_date"),
        length: row.get("length"),
        location: Location {
            venue_name: row.get("venue_name"),
            address1: row.get("address1"),
            address2: row.get("address2"),
            address3: row.get("address3"),
            city_town: row.get("city_town"),
            state_province: row.get("state_province"),
            postal_code: row.get("postal_code"),
            country: row.get("country"),
        },
        talks: Vec::new(),
    }
}

/// Helper to convert a talks/speakers join row to a Talk
fn row_to_talk(row: &Row) -> Talk {
    let speaker_id: Option<i32> = row.get("speaker_id");

    Talk {
        talk_id: row.get("talk_id"),
        camp_id: row.get("camp_id"),
        title: row.get("title"),
        abstract_text: row.get("abstract"),
        level: row.get("level"),
        speaker: speaker_id.map(|speaker_id| Speaker {
            speaker_id,
            first_name: row.get("first_name"),
            last_name: row.get("last_name"),
            middle_name: row.get("middle_name"),
            company: row.get("company"),
            company_url: row.get("company_url"),
            blog_url: row.get("blog_url"),
            twitter: row.get("twitter"),
            github: row.get("github"),
        }),
    }
}

/// Attach talks to the given camps with one query.
async fn attach_talks(
    client: &Object,
    camps: &mut [Camp],
) -> Result<(), DatabaseError> {
    if camps.is_empty() {
        return Ok(());
    }

    let camp_ids: Vec<i32> = camps.iter().map(|c| c.camp_id).collect();
    let mut talks_by_camp: HashMap<i32, Vec<Talk>> = HashMap::new();

    for talk in get_talks_for_camps(client, &camp_ids).await? {
        talks_by_camp.entry(talk.camp_id).or_default().push(talk);
    }

    for camp in camps.iter_mut() {
        camp.talks = talks_by_camp.remove(&camp.camp_id).unwrap_or_default();
    }

    Ok(())
}

// ============================================
// CAMP QUERIES
// ============================================

/// Get every camp, ordered by moniker.
pub async fn get_all_camps(
    pool: &Pool,
    include_talks: bool,
) -> Result<Vec<Camp>, DatabaseError> {
    debug!("Fetching all camps (include_talks: {})", include_talks);

    let client = client(pool).await?;

    let rows = client.query(
        concat!("SELECT ", camp_columns!(), " FROM camps ORDER BY moniker"),
        &[],
    ).await?;

    let mut camps: Vec<Camp> = rows.iter().map(row_to_camp).collect();

    if include_talks {
        attach_talks(&client, &mut camps).await?;
    }

    Ok(camps)
}

/// Get a camp by its moniker.
pub async fn get_camp_by_moniker(
    pool: &Pool,
    moniker: &str,
    include_talks: bool,
) -> Result<Option<Camp>, DatabaseError> {
    debug!("Fetching camp: {}", moniker);

    let client = client(pool).await?;

    let row = client.query_opt(
        concat!("SELECT ", camp_columns!(), " FROM camps WHERE moniker = $1"),
        &[&moniker],
    ).await?;

    let mut camp = match row {
        Some(row) => row_to_camp(&row),
        None => return Ok(None),
    };

    if include_talks {
        attach_talks(&client, std::slice::from_mut(&mut camp)).await?;
    }

    Ok(Some(camp))
}

/// Get all camps whose event starts on `event_date`.
pub async fn get_camps_by_event_date(
    pool: &Pool,
    event_date: NaiveDate,
    include_talks: bool,
) -> Result<Vec<Camp>, DatabaseError> {
    debug!("Fetching camps on {} (include_talks: {})", event_date, include_talks);

    let client = client(pool).await?;

    let rows = client.query(
        concat!(
            "SELECT ", camp_columns!(),
            " FROM camps WHERE event_date = $1 ORDER BY moniker"
        ),
        &[&event_date],
    ).await?;

    let mut camps: Vec<Camp> = rows.iter().map(row_to_camp).collect();

    if include_talks {
        attach_talks(&client, &mut camps).await?;
    }

    Ok(camps)
}

/// Insert a camp together with its talks (and any unsaved speakers).
///
/// Runs in a single transaction. Returns the stored camp with the
/// ids assigned by the database.
pub async fn insert_camp(
    pool: &Pool,
    camp: &Camp,
) -> Result<Camp, DatabaseError> {
    debug!("Inserting camp: {}", camp.moniker);

    let mut client = client(pool).await?;
    let tx = client.transaction().await?;

    let row = tx.query_one(
        concat!(
            "INSERT INTO camps (
                moniker, name, event_date, length,
                venue_name, address1, address2, address3,
                city_town, state_province, postal_code, country
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING ",
            camp_columns!()
        ),
        &[
            &camp.moniker,
            &camp.name,
            &camp.event_date,
            &camp.length,
            &camp.location.venue_name,
            &camp.location.address1,
            &camp.location.address2,
            &camp.location.address3,
            &camp.location.city_town,
            &camp.location.state_province,
            &camp.location.postal_code,
            &camp.location.country,
        ],
    ).await?;

    let mut stored = row_to_camp(&row);

    for talk in &camp.talks {
        let speaker = match &talk.speaker {
            Some(s) if s.speaker_id == 0 => Some(insert_speaker(&tx, s).await?),
            other => other.clone(),
        };
        let talk_id = insert_talk(&tx, stored.camp_id, talk, speaker.as_ref()).await?;

        stored.talks.push(Talk {
            talk_id,
            camp_id: stored.camp_id,
            speaker,
            ..talk.clone()
        });
    }

    tx.commit().await?;

    info!("Camp inserted: {} (id {})", stored.moniker, stored.camp_id);
    Ok(stored)
}

/// Update the camp row (name, moniker, dates, location).
///
/// Talks are not touched. Returns the number of rows affected.
pub async fn update_camp(
    pool: &Pool,
    camp: &Camp,
) -> Result<u64, DatabaseError> {
    debug!("Updating camp {} ({})", camp.camp_id, camp.moniker);

    let client = client(pool).await?;

    let rows_affected = client.execute(
        r#"
        UPDATE camps SET
            moniker = $2,
            name = $3,
            event_date = $4,
            length = $5,
            venue_name = $6,
            address1 = $7,
            address2 = $8,
            address3 = $9,
            city_town = $10,
            state_province = $11,
            postal_code = $12,
            country = $13
        WHERE camp_id = $1
        "#,
        &[
            &camp.camp_id,
            &camp.moniker,
            &camp.name,
            &camp.event_date,
            &camp.length,
            &camp.location.venue_name,
            &camp.location.address1,
            &camp.location.address2,
            &camp.location.address3,
            &camp.location.city_town,
            &camp.location.state_province,
            &camp.location.postal_code,
            &camp.location.country,
        ],
    ).await?;

    Ok(rows_affected)
}

/// Delete a camp. Its talks go with it (`ON DELETE CASCADE`).
pub async fn delete_camp(
    pool: &Pool,
    camp_id: i32,
) -> Result<u64, DatabaseError> {
    debug!("Deleting camp {}", camp_id);

    let client = client(pool).await?;

    let rows_affected = client.execute(
        "DELETE FROM camps WHERE camp_id = $1",
        &[&camp_id],
    ).await?;

    Ok(rows_affected)
}

/// Number of camps stored.
pub async fn count_camps(pool: &Pool) -> Result<i64, DatabaseError> {
    let client = client(pool).await?;
    let row = client.query_one("SELECT COUNT(*) FROM camps", &[]).await?;
    Ok(row.get(0))
}

/// Round-trip to the server.
pub async fn ping(pool: &Pool) -> Result<(), DatabaseError> {
    let client = client(pool).await?;
    client.query_one("SELECT 1", &[]).await?;
    Ok(())
}

// ============================================
// TALK QUERIES
// ============================================

/// Get talks (with speakers) for a set of camps, ordered by talk id.
pub async fn get_talks_for_camps(
    client: &Object,
    camp_ids: &[i32],
) -> Result<Vec<Talk>, DatabaseError> {
    let rows = client.query(
        r#"
        SELECT
            t.talk_id, t.camp_id, t.title, t.abstract, t.level,
            s.speaker_id, s.first_name, s.last_name, s.middle_name,
            s.company, s.company_url, s.blog_url, s.twitter, s.github
        FROM talks t
        LEFT JOIN speakers s ON s.speaker_id = t.speaker_id
        WHERE t.camp_id = ANY($1)
        ORDER BY t.talk_id
        "#,
        &[&camp_ids],
    ).await?;

    Ok(rows.iter().map(row_to_talk).collect())
}

/// Insert a talk, returning its id.
async fn insert_talk(
    tx: &Transaction<'_>,
    camp_id: i32,
    talk: &Talk,
    speaker: Option<&Speaker>,
) -> Result<i32, DatabaseError> {
    let speaker_id = speaker.map(|s| s.speaker_id);

    let row = tx.query_one(
        r#"
        INSERT INTO talks (camp_id, speaker_id, title, abstract, level)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING talk_id
        "#,
        &[&camp_id, &speaker_id, &talk.title, &talk.abstract_text, &talk.level],
    ).await?;

    Ok(row.get("talk_id"))
}

// ============================================
// SPEAKER QUERIES
// ============================================

/// Insert a speaker, returning the stored copy.
async fn insert_speaker(
    tx: &Transaction<'_>,
    speaker: &Speaker,
) -> Result<Speaker, DatabaseError> {
    let row = tx.query_one(
        r#"
        INSERT INTO speakers (
            first_name, last_name, middle_name, company,
            company_url, blog_url, twitter, github
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING speaker_id
        "#,
        &[
            &speaker.first_name,
            &speaker.last_name,
            &speaker.middle_name,
            &speaker.company,
            &speaker.company_url,
            &speaker.blog_url,
            &speaker.twitter,
            &speaker.github,
        ],
    ).await?;

    Ok(Speaker {
        speaker_id: row.get("speaker_id"),
        ..speaker.clone()
    })
}
