//! Ticket Repository

use super::RepoResult;
use shared::models::{Ticket, TicketCreate, TicketStatus};
use shared::util::now_millis;
use sqlx::SqliteConnection;

const COLUMNS: &str = "id, title, description, status, event_id, assigned_user_id, \
     created_by_user_id, ticket_type_id, created_at, updated_at";

pub async fn find_all(conn: &mut SqliteConnection) -> RepoResult<Vec<Ticket>> {
    let sql = format!("SELECT {COLUMNS} FROM ticket ORDER BY id");
    let tickets = sqlx::query_as::<_, Ticket>(&sql)
        .fetch_all(&mut *conn)
        .await?;
    Ok(tickets)
}

pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<Ticket>> {
    let sql = format!("SELECT {COLUMNS} FROM ticket WHERE id = ?");
    let ticket = sqlx::query_as::<_, Ticket>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(ticket)
}

/// Insert an `open` ticket on behalf of `created_by`
pub async fn create(
    conn: &mut SqliteConnection,
    data: &TicketCreate,
    created_by: i64,
) -> RepoResult<Ticket> {
    let sql = format!(
        "INSERT INTO ticket (title, description, status, event_id, assigned_user_id, \
         created_by_user_id, ticket_type_id, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING {COLUMNS}"
    );
    let ticket = sqlx::query_as::<_, Ticket>(&sql)
        .bind(&data.title)
        .bind(&data.description)
        .bind(TicketStatus::Open)
        .bind(data.event_id)
        .bind(data.assigned_user_id)
        .bind(created_by)
        .bind(data.ticket_type_id)
        .bind(now_millis())
        .fetch_one(&mut *conn)
        .await?;
    Ok(ticket)
}

/// Write back the editable fields of a ticket
pub async fn save(conn: &mut SqliteConnection, ticket: &Ticket) -> RepoResult<Option<Ticket>> {
    let sql = format!(
        "UPDATE ticket SET title = ?, description = ?, assigned_user_id = ?, status = ?, \
         updated_at = ? WHERE id = ? RETURNING {COLUMNS}"
    );
    let saved = sqlx::query_as::<_, Ticket>(&sql)
        .bind(&ticket.title)
        .bind(&ticket.description)
        .bind(ticket.assigned_user_id)
        .bind(ticket.status)
        .bind(now_millis())
        .bind(ticket.id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(saved)
}

pub async fn delete(conn: &mut SqliteConnection, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM ticket WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{event, test_support, ticket_type};
    use shared::models::EventCreate;

    #[tokio::test]
    async fn create_and_change_status() {
        let pool = test_support::pool().await;
        let mut conn = pool.acquire().await.unwrap();

        let ev = event::create(
            &mut conn,
            &EventCreate {
                title: "Expo".into(),
                description: String::new(),
                start_date: 1,
                end_date: 2,
                location: String::new(),
                max_attendees: 10,
            },
        )
        .await
        .unwrap();
        let tt = ticket_type::create(&mut conn, "Bug").await.unwrap();

        let data = TicketCreate {
            title: "Projector broken".into(),
            description: "Hall A".into(),
            event_id: ev.id,
            assigned_user_id: None,
            ticket_type_id: tt.id,
        };
        let mut ticket = create(&mut conn, &data, 1).await.unwrap();
        assert_eq!(ticket.status, TicketStatus::Open);
        assert_eq!(ticket.updated_at, None);

        ticket.status = TicketStatus::InProgress;
        let saved = save(&mut conn, &ticket).await.unwrap().unwrap();
        assert_eq!(saved.status, TicketStatus::InProgress);
        assert!(saved.updated_at.is_some());
    }

    #[tokio::test]
    async fn unknown_event_is_a_foreign_key_violation() {
        let pool = test_support::pool().await;
        let mut conn = pool.acquire().await.unwrap();
        let tt = ticket_type::create(&mut conn, "Bug").await.unwrap();

        let data = TicketCreate {
            title: "Orphan".into(),
            description: String::new(),
            event_id: 4242,
            assigned_user_id: None,
            ticket_type_id: tt.id,
        };
        let err = create(&mut conn, &data, 1).await.unwrap_err();
        assert!(matches!(err, crate::db::repository::RepoError::Validation(_)));
    }
}
