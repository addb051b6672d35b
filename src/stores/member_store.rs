use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

use crate::errors::internal::MemberError;
use crate::errors::InternalError;
use crate::types::db::member::{self, Entity as Member};

/// MemberStore touches the identity collaborator's member rows only for what
/// the custody core needs: the reward counter and lookups.
pub struct MemberStore;

impl MemberStore {
    pub fn new() -> Self {
        Self
    }

    pub async fn find_by_id(
        &self,
        conn: &impl ConnectionTrait,
        member_id: i64,
    ) -> Result<Option<member::Model>, InternalError> {
        Member::find_by_id(member_id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_member", e))
    }

    /// Additive counter update, atomic with whatever transaction the caller
    /// has open. Unknown member surfaces as NotFound so the caller rolls back.
    pub async fn add_points(
        &self,
        conn: &impl ConnectionTrait,
        member_id: i64,
        points: i64,
    ) -> Result<(), InternalError> {
        let result = Member::update_many()
            .col_expr(
                member::Column::Point,
                Expr::col(member::Column::Point).add(points),
            )
            .filter(member::Column::Id.eq(member_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("add_member_points", e))?;

        if result.rows_affected == 0 {
            return Err(MemberError::NotFound(member_id).into());
        }

        Ok(())
    }
}

impl Default for MemberStore {
    fn default() -> Self {
        Self::new()
    }
}
