use crate::repository::{RepositoryError, RepositoryState};

/// The fixed seed data, inserted in this order.
pub const SEED_CATS: [&str; 3] = ["Felix", "Garfield", "Whiskers"];

/// seed_cats
///
/// Populates the repository with the initial cat records. Called explicitly
/// from `main` once, before the server starts accepting requests; a failure
/// here aborts startup.
///
/// NOT idempotent: a second run without a `delete_all` in between inserts the
/// three names again, doubling the record count. `main` calls this exactly
/// once, and the behavior is pinned by tests rather than papered over.
pub async fn seed_cats(repo: &RepositoryState) -> Result<usize, RepositoryError> {
    tracing::info!("Starting with {} cats!", SEED_CATS.len());
    for name in SEED_CATS {
        let cat = repo.save(name).await?;
        tracing::debug!(id = %cat.id, name = %cat.name, "seeded cat");
    }
    Ok(SEED_CATS.len())
}
