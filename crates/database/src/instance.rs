//! Gateway instance registrations and credentials.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{GatewayCredentials, GatewayRegistration, NewGatewayRegistration, SellerInstance};

/// Register a seller-owned instance.
pub async fn register_seller_instance(
    pool: &SqlitePool,
    seller_id: &str,
    instance_name: &str,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO seller_instances (seller_id, instance_name)
        VALUES (?, ?)
        "#,
    )
    .bind(seller_id)
    .bind(instance_name)
    .execute(pool)
    .await
    .map_err(|e| DatabaseError::on_unique(e, "SellerInstance", instance_name))?;

    Ok(())
}

/// Find the seller registration of an instance, ignoring case.
pub async fn find_seller_instance(
    pool: &SqlitePool,
    instance_name: &str,
) -> Result<Option<SellerInstance>> {
    let row = sqlx::query_as::<_, SellerInstance>(
        r#"
        SELECT id, seller_id, instance_name, created_at
        FROM seller_instances
        WHERE instance_name = ?
        "#,
    )
    .bind(instance_name)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Add a gateway registration. Returns its id.
pub async fn add_gateway(pool: &SqlitePool, registration: &NewGatewayRegistration) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO gateway_configs (admin_user_id, instance_name, api_url, api_token)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&registration.admin_user_id)
    .bind(&registration.instance_name)
    .bind(&registration.api_url)
    .bind(&registration.api_token)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Stop using a gateway registration.
pub async fn deactivate_gateway(pool: &SqlitePool, id: i64) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE gateway_configs
        SET is_active = 0
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "GatewayRegistration",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// Find the active registration for an instance, ignoring case.
pub async fn find_active_gateway(
    pool: &SqlitePool,
    instance_name: &str,
) -> Result<Option<GatewayRegistration>> {
    let row = sqlx::query_as::<_, GatewayRegistration>(
        r#"
        SELECT id, admin_user_id, instance_name, api_url, api_token, is_active
        FROM gateway_configs
        WHERE is_active = 1 AND instance_name = ?
        ORDER BY id
        LIMIT 1
        "#,
    )
    .bind(instance_name)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Credentials used to answer on behalf of `user_id`.
///
/// The account's own active registration is preferred; otherwise the oldest
/// active registration is shared.
pub async fn gateway_credentials(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Option<GatewayCredentials>> {
    let row = sqlx::query_as::<_, GatewayCredentials>(
        r#"
        SELECT api_url, api_token
        FROM gateway_configs
        WHERE is_active = 1
        ORDER BY (admin_user_id = ?) DESC, id
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    fn registration(owner: &str, instance: &str, url: &str) -> NewGatewayRegistration {
        NewGatewayRegistration {
            admin_user_id: owner.to_string(),
            instance_name: instance.to_string(),
            api_url: url.to_string(),
            api_token: format!("{}-token", owner),
        }
    }

    #[tokio::test]
    async fn test_seller_lookup_ignores_case() {
        let db = test_db().await;
        register_seller_instance(db.pool(), "seller-1", "Loja-Azul").await.unwrap();

        let found = find_seller_instance(db.pool(), "loja-azul").await.unwrap().unwrap();
        assert_eq!(found.seller_id, "seller-1");
        assert!(find_seller_instance(db.pool(), "loja-verde").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_seller_instance() {
        let db = test_db().await;
        register_seller_instance(db.pool(), "seller-1", "loja").await.unwrap();

        let result = register_seller_instance(db.pool(), "seller-2", "LOJA").await;
        assert!(matches!(result, Err(DatabaseError::AlreadyExists { .. })));
    }

    #[tokio::test]
    async fn test_inactive_gateway_is_skipped() {
        let db = test_db().await;
        let id = add_gateway(db.pool(), &registration("admin", "Central", "https://a"))
            .await
            .unwrap();

        assert!(find_active_gateway(db.pool(), "central").await.unwrap().is_some());

        deactivate_gateway(db.pool(), id).await.unwrap();
        assert!(find_active_gateway(db.pool(), "central").await.unwrap().is_none());
        assert!(gateway_credentials(db.pool(), "admin").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_credentials_prefer_own_registration() {
        let db = test_db().await;
        add_gateway(db.pool(), &registration("admin", "central", "https://shared"))
            .await
            .unwrap();
        add_gateway(db.pool(), &registration("seller-1", "loja", "https://own"))
            .await
            .unwrap();

        let own = gateway_credentials(db.pool(), "seller-1").await.unwrap().unwrap();
        assert_eq!(own.api_url, "https://own");

        let shared = gateway_credentials(db.pool(), "seller-2").await.unwrap().unwrap();
        assert_eq!(shared.api_url, "https://shared");
    }
}
