//! WebSocket message dispatch
//!
//! Maps presentation commands onto the session handle. Accepted commands are
//! published once by the session worker on the broadcast channel, which the
//! sender is subscribed to as well, so they get no direct reply. Only
//! rejections and explicit state requests are answered directly.

use crate::error::SessionError;
use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::AppState;
use std::sync::Arc;

fn error_message(err: SessionError) -> ServerMessage {
    ServerMessage::Error {
        code: err.code().to_string(),
        msg: err.to_string(),
    }
}

/// No reply on success; the broadcast carries the new state
fn reply<T>(result: Result<T, SessionError>) -> Option<ServerMessage> {
    result.err().map(error_message)
}

/// Handle a client message and return an optional direct response
pub async fn handle_message(msg: ClientMessage, state: &Arc<AppState>) -> Option<ServerMessage> {
    match msg {
        ClientMessage::SelectLevel { level } => {
            tracing::info!("Selecting level {}", level);
            reply(state.select_level(level).await)
        }

        ClientMessage::AddPlayer { name } => {
            tracing::info!("Adding player: {}", name);
            let result = state.add_player(name).await;
            if let Err(e) = &result {
                tracing::debug!("Rejected player: {}", e);
            }
            reply(result)
        }

        ClientMessage::RemovePlayer { player_id } => {
            tracing::info!("Removing player: {}", player_id);
            reply(state.remove_player(player_id).await)
        }

        ClientMessage::ShufflePlayers => reply(state.shuffle_players().await),

        ClientMessage::Start => {
            tracing::info!("Start requested");
            reply(state.start().await)
        }

        ClientMessage::AdvanceTurn => {
            tracing::info!("Next turn requested");
            reply(state.advance_turn().await)
        }

        ClientMessage::Reset => {
            tracing::info!("Reset requested");
            reply(state.reset().await)
        }

        ClientMessage::EndSession => {
            tracing::info!("End of session requested");
            reply(state.end_session().await)
        }

        ClientMessage::RequestState => Some(match state.snapshot().await {
            Ok(snapshot) => ServerMessage::Session(snapshot),
            Err(e) => error_message(e),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::QuestionBank;
    use crate::types::{GameConfig, GamePhase};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tokio::sync::broadcast::error::TryRecvError;

    fn spawn_state() -> Arc<AppState> {
        Arc::new(AppState::spawn_with_rng(
            Arc::new(QuestionBank::builtin().unwrap()),
            GameConfig::default(),
            StdRng::seed_from_u64(4),
        ))
    }

    fn add(name: &str) -> ClientMessage {
        ClientMessage::AddPlayer {
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_accepted_command_arrives_once() {
        let state = spawn_state();
        let mut rx = state.broadcast.subscribe();

        assert!(handle_message(add("Alice"), &state).await.is_none());

        match rx.try_recv() {
            Ok(ServerMessage::Session(snapshot)) => assert_eq!(snapshot.players.len(), 1),
            other => panic!("Expected Session message, got {:?}", other),
        }
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn test_rejected_command_replies_without_broadcast() {
        let state = spawn_state();
        handle_message(add("Alice"), &state).await;
        let mut rx = state.broadcast.subscribe();

        match handle_message(add("alice"), &state).await {
            Some(ServerMessage::Error { code, .. }) => assert_eq!(code, "DUPLICATE_NAME"),
            other => panic!("Expected Error message, got {:?}", other),
        }
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn test_ignored_start_still_publishes_state() {
        let state = spawn_state();
        handle_message(add("Alice"), &state).await;
        handle_message(add("Bob"), &state).await;
        handle_message(ClientMessage::SelectLevel { level: 1 }, &state).await;
        handle_message(ClientMessage::Start, &state).await;
        let mut rx = state.broadcast.subscribe();

        assert!(handle_message(ClientMessage::Start, &state).await.is_none());
        match rx.try_recv() {
            Ok(ServerMessage::Session(snapshot)) => {
                assert_eq!(snapshot.round.phase, GamePhase::Selecting)
            }
            other => panic!("Expected Session message, got {:?}", other),
        }
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn test_request_state_replies_directly() {
        let state = spawn_state();
        let mut rx = state.broadcast.subscribe();

        match handle_message(ClientMessage::RequestState, &state).await {
            Some(ServerMessage::Session(snapshot)) => {
                assert_eq!(snapshot.round.phase, GamePhase::Idle)
            }
            other => panic!("Expected Session message, got {:?}", other),
        }
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }
}
