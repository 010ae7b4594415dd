use parley_types::error::RepositoryError;
use parley_types::user::User;

/// Repository trait for resolving and registering users.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait UserRepository: Send + Sync {
    /// Look up a user by exact username. `Ok(None)` means no such user.
    fn find_by_username(
        &self,
        username: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Register a new user. Fails with `Conflict` if the name is taken.
    fn create_user(
        &self,
        username: &str,
    ) -> impl std::future::Future<Output = Result<User, RepositoryError>> + Send;
}
