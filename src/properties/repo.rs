use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Property listing owned by a user. Every query is scoped by owner.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Property {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub rooms: i32,
    pub parking: i32,
    pub bathrooms: i32,
    pub street: String,
    pub lat: f64,
    pub lng: f64,
    pub published: bool,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct PropertyFields {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub rooms: i32,
    pub parking: i32,
    pub bathrooms: i32,
    pub street: String,
    pub lat: f64,
    pub lng: f64,
}

const COLUMNS: &str = "id, user_id, title, description, price, rooms, parking, bathrooms, \
                       street, lat, lng, published, created_at";

pub async fn list_by_user(
    db: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<Property>> {
    let rows = sqlx::query_as::<_, Property>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM properties
        WHERE user_id = $1
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#
    ))
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn find_owned(
    db: &PgPool,
    user_id: Uuid,
    id: Uuid,
) -> anyhow::Result<Option<Property>> {
    let row = sqlx::query_as::<_, Property>(&format!(
        "SELECT {COLUMNS} FROM properties WHERE id = $1 AND user_id = $2"
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn create(
    db: &PgPool,
    user_id: Uuid,
    fields: PropertyFields,
) -> anyhow::Result<Property> {
    let row = sqlx::query_as::<_, Property>(&format!(
        r#"
        INSERT INTO properties
            (user_id, title, description, price, rooms, parking, bathrooms, street, lat, lng)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(&fields.title)
    .bind(&fields.description)
    .bind(fields.price)
    .bind(fields.rooms)
    .bind(fields.parking)
    .bind(fields.bathrooms)
    .bind(&fields.street)
    .bind(fields.lat)
    .bind(fields.lng)
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn update(
    db: &PgPool,
    user_id: Uuid,
    id: Uuid,
    fields: PropertyFields,
) -> anyhow::Result<Option<Property>> {
    let row = sqlx::query_as::<_, Property>(&format!(
        r#"
        UPDATE properties
        SET title = $3, description = $4, price = $5, rooms = $6, parking = $7,
            bathrooms = $8, street = $9, lat = $10, lng = $11
        WHERE id = $1 AND user_id = $2
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(user_id)
    .bind(&fields.title)
    .bind(&fields.description)
    .bind(fields.price)
    .bind(fields.rooms)
    .bind(fields.parking)
    .bind(fields.bathrooms)
    .bind(&fields.street)
    .bind(fields.lat)
    .bind(fields.lng)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM properties WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
