// ============================================================================
// MODELS - MODULE PRINCIPAL
// ============================================================================
//
// Description:
//   Point d'entrée pour tous les modèles de données.
//   Chaque entité correspond à une table avec SeaORM.
//
// Liste des modules:
//   - health : Health check API
//   - users : Comptes (email + mot de passe)
//   - password_reset_tokens : Tokens de reset password (usage unique)
//   - matches : Miroir des matchs de l'API cricket (clé = id API)
//   - players : Joueurs réels avec leur prix en crédits
//   - match_players : Squad d'un match (joueur + camp)
//   - user_teams : Équipe fantasy d'un user pour un match
//   - team_players : Joueurs sélectionnés dans une équipe fantasy
//   - blog_posts, contact_messages : Contenu et formulaire de contact
//   - cricket : Enums métier + structures de l'API cricket
//   - dto : Data Transfer Objects des requêtes/réponses
//
// Points d'attention:
//   - Pas de SQL brut, tout passe par SeaORM
//   - Les tables sont créées par db::sync_schema (ordre des FK respecté)
//
// ============================================================================

pub mod health;
pub mod users;
pub mod password_reset_tokens;
pub mod matches;
pub mod players;
pub mod match_players;
pub mod user_teams;
pub mod team_players;
pub mod blog_posts;
pub mod contact_messages;
pub mod cricket;
pub mod dto;
