use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Roles a token can grant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Professor,
}

/// JWT payload used for authentication.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: String,           // professor ID
    pub roles: BTreeSet<Role>, // granted roles
    pub iat: usize,            // issued at (unix timestamp)
    pub exp: usize,            // expires at (unix timestamp)
    pub iss: String,
    pub aud: String,
}

pub fn has_role(claims: &Claims, required: Role) -> bool {
    claims.roles.contains(&required)
}
