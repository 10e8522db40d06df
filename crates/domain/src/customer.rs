//! User and address records.

use chrono::{DateTime, Utc};
use common::{AddressId, UserId};
use serde::{Deserialize, Serialize};

use crate::status::Role;

/// A user account, created explicitly at registration or implicitly for a
/// guest shopper identified by email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Internal identifier.
    pub id: UserId,

    /// Email address, unique across all users.
    pub email: String,

    /// Display name.
    pub name: String,

    /// Contact phone number, if provided.
    pub phone: Option<String>,

    /// Access role.
    pub role: Role,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A shipping address, captured once per checkout.
///
/// Orders reference addresses but do not own them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Internal identifier.
    pub id: AddressId,

    /// The user this address belongs to.
    pub user_id: UserId,

    /// Recipient name.
    pub full_name: String,

    /// Contact phone number.
    pub phone: String,

    /// Street address.
    pub line1: String,

    /// City.
    pub city: String,

    /// State.
    pub state: String,

    /// Postal code.
    pub pincode: String,

    /// Country.
    pub country: String,
}
