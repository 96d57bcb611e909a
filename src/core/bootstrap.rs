use uuid::Uuid;

use crate::core::config::Settings;
use crate::core::security;
use crate::core::time::primitive_now_utc;
use crate::db::types::UserRole;
use crate::store::{IdentityStore, NewUser};

/// Makes sure the configured superuser exists, is active and uses the configured password.
pub(crate) async fn ensure_superuser<S>(store: &S, settings: &Settings) -> anyhow::Result<()>
where
    S: IdentityStore + ?Sized,
{
    let admin = settings.admin();
    if admin.first_superuser_password.is_empty() {
        tracing::warn!("FIRST_SUPERUSER_PASSWORD not configured; skipping superuser creation");
        return Ok(());
    }

    let username = admin.first_superuser_username.as_str();
    let now = primitive_now_utc();

    if let Some(user) = store.find_user_by_username(username).await? {
        let verified =
            security::verify_password(&admin.first_superuser_password, &user.hashed_password)
                .unwrap_or(false);

        if verified && user.role == UserRole::Superuser && user.is_active {
            tracing::info!(username, "Default superuser already up to date");
            return Ok(());
        }

        let hashed_password = if verified {
            user.hashed_password.clone()
        } else {
            security::hash_password(&admin.first_superuser_password)?
        };

        store
            .update_user_credentials(&user.id, &hashed_password, UserRole::Superuser, true, now)
            .await?;
        tracing::info!(username, "Updated default superuser");
        return Ok(());
    }

    let hashed_password = security::hash_password(&admin.first_superuser_password)?;
    let created = store
        .create_user(NewUser {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            hashed_password,
            role: UserRole::Superuser,
            is_active: true,
            created_at: now,
        })
        .await?;

    if created.is_some() {
        tracing::info!(username, "Created default superuser");
    } else {
        tracing::warn!(username, "Default superuser was created concurrently");
    }
    Ok(())
}
