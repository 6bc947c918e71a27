//! Event Repository

use super::RepoResult;
use shared::models::{Event, EventCreate, EventUpdate};
use shared::util::now_millis;
use sqlx::SqliteConnection;

const COLUMNS: &str = "id, title, description, start_date, end_date, location, \
     max_attendees, current_attendees, is_active, created_at, updated_at";

pub async fn find_all(conn: &mut SqliteConnection) -> RepoResult<Vec<Event>> {
    let sql = format!("SELECT {COLUMNS} FROM event ORDER BY start_date");
    let events = sqlx::query_as::<_, Event>(&sql)
        .fetch_all(&mut *conn)
        .await?;
    Ok(events)
}

pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<Event>> {
    let sql = format!("SELECT {COLUMNS} FROM event WHERE id = ?");
    let event = sqlx::query_as::<_, Event>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(event)
}

pub async fn create(conn: &mut SqliteConnection, data: &EventCreate) -> RepoResult<Event> {
    let now = now_millis();
    let sql = format!(
        "INSERT INTO event (title, description, start_date, end_date, location, \
         max_attendees, current_attendees, is_active, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, 0, 1, ?, ?) RETURNING {COLUMNS}"
    );
    let event = sqlx::query_as::<_, Event>(&sql)
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.start_date)
        .bind(data.end_date)
        .bind(&data.location)
        .bind(data.max_attendees)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *conn)
        .await?;
    Ok(event)
}

pub async fn update(
    conn: &mut SqliteConnection,
    id: i64,
    data: &EventUpdate,
) -> RepoResult<Option<Event>> {
    let sql = format!(
        "UPDATE event SET title = ?, description = ?, start_date = ?, end_date = ?, \
         location = ?, max_attendees = ?, is_active = COALESCE(?, is_active), updated_at = ? \
         WHERE id = ? RETURNING {COLUMNS}"
    );
    let event = sqlx::query_as::<_, Event>(&sql)
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.start_date)
        .bind(data.end_date)
        .bind(&data.location)
        .bind(data.max_attendees)
        .bind(data.is_active)
        .bind(now_millis())
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(event)
}

pub async fn delete(conn: &mut SqliteConnection, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM event WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support;

    fn launch() -> EventCreate {
        EventCreate {
            title: "Launch".into(),
            description: "Product launch".into(),
            start_date: 1_700_000_000_000,
            end_date: 1_700_003_600_000,
            location: "Hall A".into(),
            max_attendees: 100,
        }
    }

    #[tokio::test]
    async fn create_starts_with_zero_attendees() {
        let pool = test_support::pool().await;
        let mut conn = pool.acquire().await.unwrap();

        let event = create(&mut conn, &launch()).await.unwrap();
        assert_eq!(event.current_attendees, 0);
        assert!(event.is_active);
        assert_eq!(find_all(&mut conn).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_replaces_editable_fields() {
        let pool = test_support::pool().await;
        let mut conn = pool.acquire().await.unwrap();

        let event = create(&mut conn, &launch()).await.unwrap();
        let changes = EventUpdate {
            title: "Launch v2".into(),
            description: String::new(),
            start_date: event.start_date,
            end_date: event.end_date,
            location: "Hall B".into(),
            max_attendees: 50,
            is_active: None,
        };
        let updated = update(&mut conn, event.id, &changes).await.unwrap().unwrap();
        assert_eq!(updated.title, "Launch v2");
        assert_eq!(updated.max_attendees, 50);
        assert!(updated.is_active);
    }
}
