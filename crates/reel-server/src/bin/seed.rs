//! Fills a database with benchmark data for the statistics endpoints:
//! `REEL_SEED_USERS` users (`user{i}`) and `REEL_SEED_VIDEOS` published videos
//! with random owners and 0..=20 likes each.

use std::path::PathBuf;
use std::time::Instant;

use rand::Rng;
use tracing::info;
use uuid::Uuid;

use reel_db::Database;
use reel_db::seed::NewVideo;

const USER_BATCH: usize = 1000;
const VIDEO_BATCH: usize = 5000;

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reel_seed=info,reel_db=info".into()),
        )
        .init();

    let db_path: PathBuf = std::env::var("REEL_DB_PATH")
        .unwrap_or_else(|_| "reel.db".into())
        .into();
    let user_count = env_or("REEL_SEED_USERS", 10_000);
    let video_count = env_or("REEL_SEED_VIDEOS", 100_000);

    let db = Database::open(&db_path)?;
    let started = Instant::now();

    if let Ok(password) = std::env::var("REEL_SEED_ADMIN_PASSWORD") {
        let hash = reel_api::auth::hash_password(&password)?;
        if db.create_user(&Uuid::new_v4().to_string(), "admin", &hash, true)? {
            info!("Created staff user 'admin'");
        } else {
            info!("User 'admin' already exists, leaving it alone");
        }
    }

    info!("Creating {} users...", user_count);
    let mut created = 0;
    let names: Vec<(String, String)> = (0..user_count)
        .map(|i| (Uuid::new_v4().to_string(), format!("user{}", i)))
        .collect();
    for batch in names.chunks(USER_BATCH) {
        created += db.insert_users_batch(batch)?;
    }
    info!("{} new users", created);

    // Load them back so every owner has an id, including pre-existing ones.
    let owners = db.user_ids()?;
    if owners.is_empty() {
        anyhow::bail!("no users to own videos");
    }

    info!("Creating {} videos...", video_count);
    let mut rng = rand::rng();
    let mut videos = Vec::with_capacity(VIDEO_BATCH);
    for i in 0..video_count {
        videos.push(NewVideo {
            id: Uuid::new_v4().to_string(),
            owner_id: owners[rng.random_range(0..owners.len())].clone(),
            name: format!("video_{}", i),
            is_published: true,
            total_likes: rng.random_range(0..=20),
        });
        if videos.len() >= VIDEO_BATCH {
            db.insert_videos_batch(&videos)?;
            videos.clear();
        }
    }
    if !videos.is_empty() {
        db.insert_videos_batch(&videos)?;
    }

    info!("Done in {:.1}s", started.elapsed().as_secs_f64());
    Ok(())
}

fn env_or(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
