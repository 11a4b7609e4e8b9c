use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use palmar_core::{Landmark, HAND_LANDMARK_COUNT};
use rand::Rng;
use serde_json::json;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "palmar", about = "Palmar hand-recognition check-in CLI")]
struct Cli {
    /// Base URL of the palmard HTTP API.
    #[arg(long, default_value = "http://127.0.0.1:8787")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe the daemon's health endpoint
    Health,
    /// Submit a capture from a JSON landmark file, or a synthesized one
    Recognize {
        /// JSON file holding `[[x, y, z], …]` landmarks
        #[arg(long, conflicts_with = "random")]
        file: Option<PathBuf>,
        /// Synthesize a random 21-point capture
        #[arg(long)]
        random: bool,
        /// Detection confidence to report
        #[arg(long, default_value_t = 0.9)]
        confidence: f64,
    },
    /// Attach an identity to an enrolled session
    Register {
        session_id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        age: u32,
        #[arg(long)]
        contact: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        address: String,
    },
    /// End-to-end exercise: enroll, re-recognize, register, verify
    Exercise,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let client = Client::new(cli.server);

    match cli.command {
        Commands::Health => {
            let body = client.health().await?;
            println!("{body}");
        }
        Commands::Recognize {
            file,
            random,
            confidence,
        } => {
            let landmarks = match file {
                Some(path) => load_landmarks(&path)?,
                None if random => random_hand(),
                None => bail!("pass --file <capture.json> or --random"),
            };
            let body = client.recognize(&landmarks, confidence).await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Commands::Register {
            session_id,
            name,
            age,
            contact,
            email,
            address,
        } => {
            let (status, body) = client
                .register(&session_id, &name, age, &contact, &email, &address)
                .await?;
            if status != 200 {
                bail!("registration failed ({status}): {body}");
            }
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Commands::Exercise => exercise(&client).await?,
    }

    Ok(())
}

struct Client {
    base: String,
    http: reqwest::Client,
}

impl Client {
    fn new(base: String) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    async fn health(&self) -> Result<serde_json::Value> {
        let resp = self
            .http
            .get(format!("{}/api/health", self.base))
            .send()
            .await
            .context("daemon unreachable")?;
        Ok(resp.json().await?)
    }

    async fn recognize(
        &self,
        landmarks: &[Landmark],
        confidence: f64,
    ) -> Result<serde_json::Value> {
        let resp = self
            .http
            .post(format!("{}/api/hand-recognition", self.base))
            .json(&json!({ "landmarks": landmarks, "confidence": confidence }))
            .send()
            .await
            .context("daemon unreachable")?;
        let status = resp.status();
        let body: serde_json::Value = resp.json().await?;
        if !status.is_success() {
            bail!("capture rejected ({status}): {body}");
        }
        Ok(body)
    }

    async fn register(
        &self,
        session_id: &str,
        name: &str,
        age: u32,
        contact: &str,
        email: &str,
        address: &str,
    ) -> Result<(u16, serde_json::Value)> {
        let resp = self
            .http
            .post(format!("{}/api/register-user", self.base))
            .json(&json!({
                "sessionId": session_id,
                "name": name,
                "age": age,
                "contact": contact,
                "email": email,
                "address": address,
            }))
            .send()
            .await
            .context("daemon unreachable")?;
        let status = resp.status().as_u16();
        let body: serde_json::Value = resp.json().await?;
        Ok((status, body))
    }
}

fn load_landmarks(path: &Path) -> Result<Vec<Landmark>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let landmarks: Vec<Landmark> =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
    Ok(landmarks)
}

/// Synthesize a plausible capture: 21 points in the normalized-image value
/// ranges a hand-tracking frontend reports.
fn random_hand() -> Vec<Landmark> {
    let mut rng = rand::thread_rng();
    (0..HAND_LANDMARK_COUNT)
        .map(|_| Landmark {
            x: rng.gen_range(0.3..0.7),
            y: rng.gen_range(0.3..0.7),
            z: rng.gen_range(0.0..0.05),
        })
        .collect()
}

/// Scripted end-to-end pass against a running daemon. Exits non-zero on the
/// first deviation from the expected flow.
async fn exercise(client: &Client) -> Result<()> {
    println!("1/6 health…");
    let health = client.health().await?;
    if health["status"] != "ok" {
        bail!("unexpected health response: {health}");
    }

    println!("2/6 recognize fresh hand…");
    let hand = random_hand();
    let body = client.recognize(&hand, 0.85).await?;
    if body["is_new_user"] != true {
        bail!("expected a new enrollment, got: {body}");
    }
    let session_id = body["session_id"]
        .as_str()
        .context("new enrollment carried no session id")?
        .to_string();
    println!("    enrolled session {session_id}");

    println!("3/6 recognize identical capture…");
    let body = client.recognize(&hand, 0.85).await?;
    if body["is_new_user"] != false {
        bail!("expected a match, got: {body}");
    }
    let similarity = body["similarity"].as_f64().unwrap_or(f64::MAX);
    if similarity > 1e-9 {
        bail!("identical capture scored {similarity}, expected 0");
    }

    println!("4/6 register identity…");
    let (status, body) = client
        .register(
            &session_id,
            "Exercise User",
            42,
            "+1-555-0199",
            "exercise@example.com",
            "1 Test Lane",
        )
        .await?;
    if status != 200 {
        bail!("registration failed ({status}): {body}");
    }

    println!("5/6 recognize after registration…");
    let body = client.recognize(&hand, 0.85).await?;
    if body["registered"] != true {
        bail!("expected a registered match, got: {body}");
    }

    println!("6/6 register bogus session…");
    let (status, _) = client
        .register(
            "00000000-0000-0000-0000-000000000000",
            "Nobody",
            0,
            "-",
            "nobody@example.com",
            "-",
        )
        .await?;
    if status != 404 {
        bail!("expected 404 for unknown session, got {status}");
    }

    println!("all checks passed");
    Ok(())
}
