//! Ticket Type Repository

use super::RepoResult;
use shared::models::TicketType;
use sqlx::SqliteConnection;

pub async fn find_all(conn: &mut SqliteConnection) -> RepoResult<Vec<TicketType>> {
    let types = sqlx::query_as::<_, TicketType>("SELECT id, name FROM ticket_type ORDER BY name")
        .fetch_all(&mut *conn)
        .await?;
    Ok(types)
}

pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<TicketType>> {
    let ticket_type = sqlx::query_as::<_, TicketType>("SELECT id, name FROM ticket_type WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(ticket_type)
}

pub async fn find_by_name(
    conn: &mut SqliteConnection,
    name: &str,
) -> RepoResult<Option<TicketType>> {
    let ticket_type =
        sqlx::query_as::<_, TicketType>("SELECT id, name FROM ticket_type WHERE name = ?")
            .bind(name)
            .fetch_optional(&mut *conn)
            .await?;
    Ok(ticket_type)
}

pub async fn create(conn: &mut SqliteConnection, name: &str) -> RepoResult<TicketType> {
    let ticket_type =
        sqlx::query_as::<_, TicketType>("INSERT INTO ticket_type (name) VALUES (?) RETURNING id, name")
            .bind(name)
            .fetch_one(&mut *conn)
            .await?;
    Ok(ticket_type)
}
