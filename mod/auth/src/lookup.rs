use domus_core::ServiceError;

use crate::model::UserRecord;

/// Read-side contract against the user directory, which is owned by the
/// rest of the platform.
///
/// Implementations must return `NotFound` for a wrong password as well as
/// for an unknown phone, so callers cannot tell the two apart.
pub trait UserLookup: Send + Sync {
    /// Resolve a user by phone and password.
    fn by_phone_and_password(
        &self,
        phone: &str,
        password: &str,
    ) -> Result<UserRecord, ServiceError>;

    /// Resolve a user by id.
    fn by_id(&self, id: i64) -> Result<UserRecord, ServiceError>;
}
