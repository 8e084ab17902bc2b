use super::Id;

/// Marker for authenticated accounts (admins and clients).
#[derive(Debug)]
pub struct Account;

pub type AccountId = Id<Account>;

/// Role asserted by the external authentication layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Client,
}

/// The authenticated identity an operation runs on behalf of.
///
/// The engine trusts this value; it never authenticates on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub account: AccountId,
    pub role: Role,
}

impl Caller {
    pub fn admin(account: AccountId) -> Self {
        Self { account, role: Role::Admin }
    }

    pub fn client(account: AccountId) -> Self {
        Self { account, role: Role::Client }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Admins may touch any record; clients only their own.
    pub fn can_access(&self, owner: AccountId) -> bool {
        self.is_admin() || self.account == owner
    }
}
