//! Headless entry point.
//!
//! This binary does not speak WebSocket; the transport, matchmaking, and
//! client handshake are external collaborators left to the deployment that
//! embeds this crate. What it does do is own the `Room` tick loop and its
//! environment-driven configuration, so it can run standalone for local
//! diagnostics and so a real transport layer has a concrete example of how
//! to drive a `Room`.

use std::env;
use std::panic::{self, AssertUnwindSafe};
use std::thread;
use std::time::Duration;
use territory_server::{Room, RoomConfig};

fn main() {
    env_logger::init();

    let config = config_from_env();
    log::info!(
        "starting room at {} Hz (bots fill in below {} humans, target {})",
        config.tick_rate_hz,
        config.min_human_players_for_bots,
        config.target_total_players
    );

    let mut room = Room::new(config.clone(), seed_from_env());
    room.join_human("local".to_string(), "local-player".to_string(), "#3366ff".to_string());

    let tick_duration = Duration::from_secs_f64(1.0 / f64::from(config.tick_rate_hz));
    loop {
        // A panic inside a single tick must not take the whole room down:
        // catch it at the tick boundary, log it, and keep ticking.
        match panic::catch_unwind(AssertUnwindSafe(|| room.step())) {
            Ok(state) => log::debug!("tick produced {} player states", state.players.len()),
            Err(payload) => log::error!("tick panicked, skipping: {}", panic_message(&payload)),
        }
        thread::sleep(tick_duration);
    }
}

fn panic_message(payload: &Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

fn config_from_env() -> RoomConfig {
    let mut config = RoomConfig::default();
    if let Ok(port) = env::var("PORT") {
        log::info!("PORT={port} set, but this binary does not open a listener itself");
    }
    if let Ok(node_env) = env::var("NODE_ENV") {
        log::info!("NODE_ENV={node_env}");
    }
    if let Ok(target) = env::var("TARGET_TOTAL_PLAYERS") {
        if let Ok(parsed) = target.parse() {
            config.target_total_players = parsed;
        }
    }
    if let Ok(min_humans) = env::var("MIN_HUMAN_PLAYERS_FOR_BOTS") {
        if let Ok(parsed) = min_humans.parse() {
            config.min_human_players_for_bots = parsed;
        }
    }
    config
}

fn seed_from_env() -> u64 {
    env::var("ROOM_SEED")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}
