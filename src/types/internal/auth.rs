use serde::{Deserialize, Serialize};

use super::principal::{Principal, Role};

/// JWT claims issued by the identity collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Member id as a string (JWT `sub` is conventionally a string)
    pub sub: String,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    /// Convert validated claims into the typed principal the services consume.
    ///
    /// Fails when `sub` is not a member id, which means the token was minted
    /// for a different audience.
    pub fn to_principal(&self) -> Option<Principal> {
        self.sub.parse::<i64>().ok().map(|id| Principal::new(id, self.role))
    }
}
