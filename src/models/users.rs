use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub open_id: String, // Identifiant public opaque (claim du JWT)
    #[sea_orm(unique)]
    pub email: String, // Toujours stocké trim + minuscules
    #[serde(skip_serializing)] // Ne jamais exposer le hash en JSON
    pub password_hash: String, // Format PHC: $pbkdf2-sha256$i=...,l=32$salt$hash
    pub name: String,
    pub phone: Option<String>,
    pub date_of_birth: Option<Date>,
    pub state: Option<String>,
    pub is_verified: bool,
    pub is_blocked: bool,
    pub role: String, // 'user', 'admin'
    pub total_points: i32,
    pub matches_played: i32,
    pub created_at: DateTime,
    pub updated_at: DateTime,
    pub last_signed_in: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_teams::Entity")]
    UserTeams,

    #[sea_orm(has_many = "super::password_reset_tokens::Entity")]
    PasswordResets,
}

impl Related<super::user_teams::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserTeams.def()
    }
}

impl Related<super::password_reset_tokens::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PasswordResets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
