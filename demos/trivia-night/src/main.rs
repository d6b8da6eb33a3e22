//! A scripted Friday-night quiz: six players pay in, the host starts the
//! game at the scheduled time, everyone submits a score, and the pot is
//! paid out. Run with `RUST_LOG=debug` to watch the room's own logging.

use std::fmt::Write as _;

use chrono::{Duration, Utc};
use quizpot::prelude::*;
use tracing::info;

// ---------------------------------------------------------------------------
// Cast
// ---------------------------------------------------------------------------

const ENTRY_FEE: u64 = 250;

const HOST: &str = "tok-alice";
const PLAYERS: [&str; 5] = ["tok-bob", "tok-carol", "tok-dave", "tok-erin", "tok-frank"];

fn provider() -> TokenMap {
    let mut tokens = TokenMap::new();
    for token in [HOST].into_iter().chain(PLAYERS) {
        let user = token.trim_start_matches("tok-");
        tokens = tokens.with_token(token, user);
    }
    tokens
}

// ---------------------------------------------------------------------------
// Presentation helpers
// ---------------------------------------------------------------------------

fn ordinal(position: u32) -> String {
    let suffix = match position % 100 {
        11..=13 => "th",
        _ => match position % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        },
    };
    format!("{position}{suffix}")
}

fn render_leaderboard(view: &RoomView) -> String {
    let mut out = String::new();
    for (index, entry) in view.participants.iter().enumerate() {
        let position = index as u32 + 1;
        let prize = view
            .prize_distribution
            .prizes
            .iter()
            .find(|p| p.position == position)
            .map(|p| p.amount)
            .unwrap_or(0);
        let payout = if prize > 0 {
            format!("wins {prize} credits")
        } else {
            "out of the money".to_string()
        };
        let _ = writeln!(
            out,
            "  {:>4}  {:<8} {:>4} pts  {payout}",
            ordinal(position),
            entry.user,
            entry.score,
        );
    }
    out
}

// ---------------------------------------------------------------------------
// The night itself
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let service = RoomService::new(provider());

    // Registration closes one second from now and the game starts a second
    // after that, so the whole night fits in one run.
    let now = Utc::now();
    let room = service
        .create_room(
            HOST,
            NewRoom {
                title: "Friday Trivia Night".into(),
                description: "Six rounds of general knowledge, winners split the pot.".into(),
                entry_fee: ENTRY_FEE,
                difficulty: Difficulty::Hard,
                scheduled_start_time: now + Duration::seconds(2),
                registration_deadline: now + Duration::seconds(1),
                duration_minutes: 45,
            },
        )
        .await?;
    let room_id = room.id;
    info!(%room_id, entry_fee = ENTRY_FEE, "registration open");

    for token in PLAYERS {
        let view = service.join_room(token, room_id).await?;
        info!(seats = view.current_participants, "player paid in");
    }

    let wait = (room.scheduled_start_time - Utc::now()).num_milliseconds().max(0) as u64;
    info!(wait_ms = wait, "waiting for the scheduled start");
    tokio::time::sleep(std::time::Duration::from_millis(wait + 100)).await;

    service.start_game(HOST, room_id).await?;

    // Bob and Erin tie on points; Bob keeps second place because he
    // turned his answers in first.
    let submissions = [
        (HOST, 72),
        ("tok-dave", 64),
        ("tok-carol", 91),
        ("tok-bob", 85),
        ("tok-erin", 85),
        ("tok-frank", 58),
    ];
    for (token, score) in submissions {
        let entry = service.submit_score(token, room_id, score).await?;
        info!(user = %entry.user, score = entry.score, "answers in");
    }

    let finished = service.get_room(room_id).await?;
    println!("\n=== {} ===", finished.title);
    print!("{}", render_leaderboard(&finished));
    println!(
        "\npot {} credits, platform keeps {}, {} paid out to {} winners",
        finished.prize_distribution.total_pool,
        finished.prize_distribution.platform_fee,
        finished.prize_distribution.distributed(),
        finished.prize_distribution.prizes.len(),
    );

    // The host settles up and retires the room.
    let closed = service.close_room(room_id).await?;
    println!("\nfinal room record:");
    println!("{}", serde_json::to_string_pretty(&closed)?);

    Ok(())
}
