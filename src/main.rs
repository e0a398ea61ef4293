//! Visual cortex demo: splash sequence then Game of Life on a simulated
//! LED matrix.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                        LocalExecutor                          │
//! │                                                               │
//! │  VisualCortex ──▶ BridgeDisplay ──▶ ChannelBridge ─┐          │
//! │  MatrixController ─────────────────▶ ChannelBridge ─┤          │
//! │                                                    ▼          │
//! │                   BridgeEndpoint ──▶ MatrixSimulator          │
//! │                                      (SharedFramebuffer)      │
//! │  readiness events ── SplashTrigger ──▶ splash event queue      │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage: `cortex-matrix [CONFIG.json] [GAME_SECS]`
#![deny(unused_must_use)]

use core::time::Duration;

use anyhow::{Context, Result};
use async_io_mini::Timer;
use futures_lite::future;
use log::info;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use cortex_matrix::adapters::{BridgeDisplay, LogEventSink, MatrixSimulator, SharedFramebuffer, TimerDelay};
use cortex_matrix::app::VisualCortex;
use cortex_matrix::bridge::channel_bridge;
use cortex_matrix::config::CortexConfig;
use cortex_matrix::grid::patterns::{GLIDER, R_PENTOMINO};
use cortex_matrix::matrix::MatrixController;

const DEFAULT_GAME_SECS: u64 = 10;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => load_config(&path)?,
        None => CortexConfig::default(),
    };
    let game_secs = match args.next() {
        Some(secs) => secs.parse().with_context(|| format!("invalid GAME_SECS '{secs}'"))?,
        None => DEFAULT_GAME_SECS,
    };

    let executor: edge_executor::LocalExecutor<'_, 8> = edge_executor::LocalExecutor::new();
    future::block_on(executor.run(demo(config, Duration::from_secs(game_secs))))
}

fn load_config(path: &str) -> Result<CortexConfig> {
    let json = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    let config = CortexConfig::from_json(&json).with_context(|| format!("loading {path}"))?;
    info!("Loaded configuration from {}", path);
    Ok(config)
}

async fn demo(config: CortexConfig, game: Duration) -> Result<()> {
    let (client, endpoint) = channel_bridge();
    let framebuffer = SharedFramebuffer::new();
    let mut simulator = MatrixSimulator::new(framebuffer.clone());

    let session = async {
        let mut matrix = MatrixController::new(client.clone(), &config.matrix);
        let mut cortex = VisualCortex::with_events(
            BridgeDisplay::new(client.clone()),
            TimerDelay::new(),
            LogEventSink::new(),
            config.clone(),
        );

        cortex.initialize().await?;
        matrix
            .set_brightness(i32::from(config.matrix.brightness))
            .await?;

        // Components report readiness while the splash is on screen.
        let trigger = cortex.splash_trigger();
        let (outcome, ()) = future::zip(cortex.show_splash_screen(), async move {
            for name in ["led_matrix_ready", "pathways_ready"] {
                Timer::after(Duration::from_millis(2500)).await;
                trigger.trigger(name);
            }
        })
        .await;
        let outcome = outcome?;
        info!("Splash outcome: {:?}", outcome);

        cortex.seed_random(&mut SmallRng::from_entropy());
        cortex.grid_mut().stamp(&GLIDER, 1, 1)?;
        cortex.grid_mut().stamp(&R_PENTOMINO, 30, 30)?;

        let control = cortex.run_control();
        let (ran, ()) = future::zip(cortex.run_game(), async move {
            Timer::after(game).await;
            control.stop();
        })
        .await;
        ran?;

        info!(
            "Game of Life ran {} generations, matrix brightness {}%",
            cortex.grid().generation(),
            framebuffer.borrow().brightness()
        );
        cortex.cleanup().await?;
        Ok::<(), anyhow::Error>(())
    };

    future::or(session, async {
        simulator.run(&endpoint).await;
        Ok(())
    })
    .await?;

    info!("Simulator answered {} commands", simulator.handled());
    Ok(())
}
