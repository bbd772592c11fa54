//! Defines the token stored in the auth cookie.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::auth::UserID;

// The default serializer for `OffsetDateTime` writes midnight as "0:00:00.0",
// which fails to parse back since the hour must be two digits.
time::serde::format_description!(
    token_expiry_format,
    OffsetDateTime,
    "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond] [offset_hour sign:mandatory]:[offset_minute]:[offset_second]"
);

/// Identifies the logged in user and when their session ends.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct Token {
    pub user_id: UserID,

    #[serde(with = "token_expiry_format")]
    pub expires_at: OffsetDateTime,
}
