use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

// Joueur retenu dans le squad d'un match, avec le camp pour lequel il joue
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "match_players")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub match_api_id: String,
    pub player_api_id: String,
    pub team_name: String,
    pub points_scored: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::matches::Entity",
        from = "Column::MatchApiId",
        to = "super::matches::Column::ApiId",
        on_delete = "Cascade"
    )]
    Match,

    #[sea_orm(
        belongs_to = "super::players::Entity",
        from = "Column::PlayerApiId",
        to = "super::players::Column::ApiId",
        on_delete = "Cascade"
    )]
    Player,
}

impl Related<super::matches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Match.def()
    }
}

impl Related<super::players::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Player.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
