use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

// Joueur sélectionné dans une équipe fantasy.
// name/role/side/credits sont figés au moment de la sélection.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "team_players")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub team_id: i32,
    pub player_api_id: String,
    pub player_name: String,
    pub role: String,
    pub side: String, // Camp réel du joueur dans ce match
    #[sea_orm(column_type = "Decimal(Some((4, 1)))")]
    pub credits: Decimal,
    pub is_captain: bool,
    pub is_vice_captain: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user_teams::Entity",
        from = "Column::TeamId",
        to = "super::user_teams::Column::Id",
        on_delete = "Cascade"
    )]
    Team,
}

impl Related<super::user_teams::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Team.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
