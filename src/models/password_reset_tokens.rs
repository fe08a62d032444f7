// ============================================================================
// MODÈLE : PASSWORD RESET TOKENS
// ============================================================================
//
// Description:
//   Tokens de réinitialisation de mot de passe, table password_resets.
//
// Colonnes:
//   - id (INTEGER, PRIMARY KEY)
//   - user_id (INTEGER, NOT NULL, FK vers users, ON DELETE CASCADE)
//   - token (VARCHAR, UNIQUE, NOT NULL) - 64 caractères base64 URL-safe
//   - expires_at (TIMESTAMP, NOT NULL) - created_at + RESET_TOKEN_TTL_MINUTES
//   - used (BOOLEAN, NOT NULL)
//   - created_at (TIMESTAMP, NOT NULL)
//
// Workflow:
//   1. User demande un reset via POST /api/auth/forgot-password
//   2. Si le compte existe, le backend insère un token (réponse identique sinon)
//   3. Le token est loggé (pas encore d'envoi d'email)
//   4. Frontend envoie POST /api/auth/reset-password avec token + nouveau password
//   5. Backend vérifie: token existe, pas expiré, pas utilisé
//   6. Backend change le password et passe used = true (update conditionnel)
//
// Points d'attention:
//   - Un token ne peut être utilisé qu'une fois
//   - Le passage à used = true se fait avec WHERE used = false pour
//     qu'un même token ne serve qu'une fois même en concurrence
//
// ============================================================================

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "password_resets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub user_id: i32,

    #[sea_orm(unique)]
    pub token: String,

    pub expires_at: DateTime,

    pub used: bool,

    pub created_at: DateTime,
}

impl Model {
    pub fn is_usable_at(&self, now: DateTime) -> bool {
        !self.used && self.expires_at >= now
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
