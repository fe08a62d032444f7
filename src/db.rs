// connexion BD + création du schéma

use sea_orm::sea_query::{Index, IndexCreateStatement};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait, Schema};
use tracing::info;

use crate::config::AppConfig;
use crate::models::{
    blog_posts, contact_messages, match_players, matches, password_reset_tokens, players,
    team_players, user_teams, users,
};

pub async fn establish_connection(config: &AppConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.database_url.clone());
    options.sqlx_logging(false);

    Database::connect(options).await
}

/// Crée les tables manquantes et les index uniques composites.
/// Idempotent: IF NOT EXISTS partout.
pub async fn sync_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let schema = Schema::new(db.get_database_backend());

    // Ordre imposé par les clés étrangères
    create_table(db, &schema, users::Entity).await?;
    create_table(db, &schema, password_reset_tokens::Entity).await?;
    create_table(db, &schema, matches::Entity).await?;
    create_table(db, &schema, players::Entity).await?;
    create_table(db, &schema, match_players::Entity).await?;
    create_table(db, &schema, user_teams::Entity).await?;
    create_table(db, &schema, team_players::Entity).await?;
    create_table(db, &schema, blog_posts::Entity).await?;
    create_table(db, &schema, contact_messages::Entity).await?;

    // Une seule équipe par (user, match)
    create_index(
        db,
        Index::create()
            .name("uq_user_teams_user_match")
            .table(user_teams::Entity)
            .col(user_teams::Column::UserId)
            .col(user_teams::Column::MatchApiId)
            .unique()
            .if_not_exists()
            .to_owned(),
    )
    .await?;

    // Un joueur au plus une fois par équipe
    create_index(
        db,
        Index::create()
            .name("uq_team_players_team_player")
            .table(team_players::Entity)
            .col(team_players::Column::TeamId)
            .col(team_players::Column::PlayerApiId)
            .unique()
            .if_not_exists()
            .to_owned(),
    )
    .await?;

    create_index(
        db,
        Index::create()
            .name("uq_match_players_match_player")
            .table(match_players::Entity)
            .col(match_players::Column::MatchApiId)
            .col(match_players::Column::PlayerApiId)
            .unique()
            .if_not_exists()
            .to_owned(),
    )
    .await?;

    info!("database schema in sync");
    Ok(())
}

async fn create_table<E: EntityTrait>(
    db: &DatabaseConnection,
    schema: &Schema,
    entity: E,
) -> Result<(), DbErr> {
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();

    db.execute(db.get_database_backend().build(&statement)).await?;
    Ok(())
}

async fn create_index(db: &DatabaseConnection, statement: IndexCreateStatement) -> Result<(), DbErr> {
    db.execute(db.get_database_backend().build(&statement)).await?;
    Ok(())
}
