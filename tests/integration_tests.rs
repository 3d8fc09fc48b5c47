//! Integration tests across the simulation, the leaderboard server and the client
//!
//! Session tests drive the shared simulation the way the client loop does.
//! Leaderboard tests start a real server on a loopback port and talk to it
//! over HTTP.

use client::input::{Autopilot, Device};
use client::network::{ClientError, HttpScoreSink, LeaderboardClient};
use server::network::{Server, ServerConfig};
use server::store::ScoreStore;
use shared::{
    GameEvent, GameState, Phase, PlayerInput, ScoreSubmission, Session, SimConfig, TokenOutcome,
    MAX_ESCAPES, TICK_MS,
};
use std::sync::Arc;

/// SESSION TESTS
mod session_tests {
    use super::*;

    /// A single catch scores 10 points and spends one level token
    #[test]
    fn single_catch_scores_and_spends_token() {
        let mut session = Session::new(SimConfig::default(), 21).unwrap();

        // Wait for the first sprite to be inside the viewport, where the player can reach it
        let width = session.config().viewport_width;
        while session
            .sprites()
            .first()
            .map_or(true, |s| s.position.x < 0.0 || s.position.x > width)
        {
            session.step();
        }
        let target = session.sprites()[0].position;
        move_player_to(&mut session, target.x, target.y);

        let events = session.step();
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::Caught { points, .. } if *points == 10.0)));

        let snapshot = session.snapshot();
        assert_eq!(snapshot.score, 10.0);
        assert_eq!(snapshot.tokens_to_next_level, 4);
        assert_eq!(snapshot.level, 1);
        assert_eq!(session.alive_count(), 0);

        // Caught sprite lingers for its catch animation, then disappears
        for _ in 0..100 {
            session.step();
            if session.sprites().iter().all(|s| s.is_alive()) {
                break;
            }
        }
        assert!(session.sprites().iter().all(|s| s.is_alive()));
    }

    /// Five spent tokens raise the level and tighten the requirements
    #[test]
    fn level_up_after_five_tokens() {
        let mut state = GameState::new();
        let mut outcomes = Vec::new();
        for _ in 0..5 {
            state.add_score(10.0 * state.multiplier());
            outcomes.push(state.consume_token());
        }

        assert_eq!(outcomes[4], TokenOutcome::LevelUp { level: 2 });
        assert_eq!(state.level(), 2);
        assert_eq!(state.tokens_to_next_level(), 5);
        assert_eq!(state.entities_needed_per_token(), 2);
        assert!((state.multiplier() - 1.2).abs() < 1e-9);
    }

    /// Sprites that nobody catches end the game after five escapes
    #[test]
    fn five_escapes_end_game() {
        let mut session = Session::new(SimConfig::default(), 8).unwrap();
        let height = session.config().viewport_height;
        move_player_to(&mut session, 0.0, height);

        let mut game_over_events = 0;
        for _ in 0..100_000 {
            let events = session.advance(TICK_MS);
            assert!(!events.iter().any(|e| matches!(e, GameEvent::Caught { .. })));
            game_over_events += events
                .iter()
                .filter(|e| matches!(e, GameEvent::GameOver { .. }))
                .count();
            if session.state().is_game_over() {
                break;
            }
        }

        assert!(session.state().is_game_over());
        assert_eq!(session.escaped_count(), MAX_ESCAPES);
        assert_eq!(game_over_events, 1);
        assert_eq!(session.phase(), Phase::GameOver);

        // Nothing moves after game over
        let clock = session.clock_ms();
        assert!(session.advance(TICK_MS * 10).is_empty());
        assert_eq!(session.clock_ms(), clock);
    }

    /// Restarting gives a fresh session with no player name
    #[test]
    fn restart_resets_everything() {
        let mut session = Session::new(SimConfig::default(), 8).unwrap();
        session.record_player_name("Al");
        let height = session.config().viewport_height;
        move_player_to(&mut session, 0.0, height);
        while !session.state().is_game_over() {
            session.step();
        }

        let mut sink: Vec<ScoreSubmission> = Vec::new();
        session.restart(&mut sink);

        // No catches means a zero score, which is never submitted
        assert!(sink.is_empty());

        let snapshot = session.snapshot();
        assert_eq!(snapshot.score, 0.0);
        assert_eq!(snapshot.level, 1);
        assert_eq!(snapshot.tokens_to_next_level, 5);
        assert_eq!(snapshot.multiplier, 1.0);
        assert_eq!(snapshot.escaped_count, 0);
        assert!(!snapshot.is_game_over);
        assert_eq!(snapshot.player_name, None);
        assert!(session.sprites().is_empty());
        assert_eq!(session.player().position, session.config().center());
    }

    /// Same seed and inputs give the same game
    #[test]
    fn seeded_sessions_are_deterministic() {
        let mut a = Session::new(SimConfig::default(), 1234).unwrap();
        let mut b = Session::new(SimConfig::default(), 1234).unwrap();
        let autopilot = Autopilot::new(Device::Stick, 12.0);

        for _ in 0..2_000 {
            let input = autopilot.next_input(&a);
            a.apply_input(input);
            b.apply_input(input);
            assert_eq!(a.step(), b.step());
        }

        assert_eq!(a.snapshot(), b.snapshot());
        assert_eq!(a.sprites(), b.sprites());
    }

    fn move_player_to(session: &mut Session, x: f32, y: f32) {
        let current = session.player().position;
        session.apply_input(PlayerInput::PointerDelta {
            dx: x - current.x,
            dy: y - current.y,
        });
    }
}

/// LEADERBOARD SERVER TESTS
mod leaderboard_tests {
    use super::*;

    #[tokio::test]
    async fn submissions_are_ranked() {
        let base_url = start_server(ServerConfig::default()).await;
        let client = LeaderboardClient::new(&base_url).unwrap();

        let first = client
            .submit(&ScoreSubmission::new("Al", 50, 1))
            .await
            .unwrap();
        assert!(first.success);
        assert_eq!(first.rank, 1);

        let second = client
            .submit(&ScoreSubmission::new("Bo", 150, 1))
            .await
            .unwrap();
        assert_eq!(second.rank, 1);

        let third = client
            .submit(&ScoreSubmission::new("Cy", 50, 1))
            .await
            .unwrap();
        assert_eq!(third.rank, 2);

        let top = client.top().await.unwrap();
        let names: Vec<&str> = top.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Bo", "Al", "Cy"]);
        assert_eq!(
            top.iter().map(|e| e.rank).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[tokio::test]
    async fn implausible_score_is_rejected() {
        let base_url = start_server(ServerConfig::default()).await;
        let client = LeaderboardClient::new(&base_url).unwrap();

        let err = client
            .submit(&ScoreSubmission::new("Al", 50_000, 1))
            .await
            .unwrap_err();
        match err {
            ClientError::Rejected { status, .. } => assert_eq!(status, 400),
            other => panic!("Unexpected error: {}", other),
        }
        assert!(client.top().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_body_is_rejected() {
        let base_url = start_server(ServerConfig::default()).await;

        let response = reqwest::Client::new()
            .post(format!("{}/leaderboard", base_url))
            .header("content-type", "application/json")
            .body(r#"{"name":"Al","score":"lots","level":1}"#)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 400);

        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Invalid score submission");
    }

    #[tokio::test]
    async fn origin_is_enforced_when_configured() {
        let base_url = start_server(ServerConfig {
            plausibility_check: true,
            allowed_origin: Some("https://game.example".to_string()),
        })
        .await;
        let submission = ScoreSubmission::new("Al", 50, 1);

        let anonymous = LeaderboardClient::new(&base_url).unwrap();
        match anonymous.submit(&submission).await {
            Err(ClientError::Rejected { status, .. }) => assert_eq!(status, 403),
            other => panic!("Unexpected result: {:?}", other),
        }

        let trusted = LeaderboardClient::with_origin(&base_url, "https://game.example").unwrap();
        let response = trusted.submit(&submission).await.unwrap();
        assert_eq!(response.rank, 1);
    }

    #[tokio::test]
    async fn unavailable_store_reports_server_error() {
        let server = Server::new(
            "127.0.0.1:0",
            ScoreStore::unavailable(),
            ServerConfig::default(),
        )
        .await
        .unwrap();
        let base_url = format!("http://{}", server.local_addr().unwrap());
        tokio::spawn(server.run());

        let client = LeaderboardClient::new(&base_url).unwrap();
        match client.top().await {
            Err(ClientError::Rejected { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "Database connection error");
            }
            other => panic!("Unexpected result: {:?}", other),
        }
    }
}

/// CLIENT-SERVER TESTS
mod client_server_tests {
    use super::*;

    /// Autopilot plays a round and its final score reaches the leaderboard
    #[tokio::test]
    async fn finished_round_is_submitted() {
        let base_url = start_server(ServerConfig::default()).await;
        let client = Arc::new(LeaderboardClient::new(&base_url).unwrap());
        let mut sink = HttpScoreSink::new(Arc::clone(&client), tokio::runtime::Handle::current());

        let mut session = Session::new(SimConfig::default(), 99).unwrap();
        session.record_player_name("bot");
        let autopilot = Autopilot::new(Device::Pointer, 12.0);

        for _ in 0..3_000 {
            let input = autopilot.next_input(&session);
            session.apply_input(input);
            session.step();
            if session.state().is_game_over() {
                break;
            }
        }

        let expected = session.final_submission().unwrap();
        session.restart(&mut sink);
        sink.flush().await;

        let top = client.top().await.unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].name, "bot");
        assert_eq!(top[0].score, expected.score);
        assert_eq!(top[0].level, expected.level);
    }
}

async fn start_server(config: ServerConfig) -> String {
    let server = Server::new("127.0.0.1:0", ScoreStore::in_memory(), config)
        .await
        .unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.run());
    format!("http://{}", addr)
}
