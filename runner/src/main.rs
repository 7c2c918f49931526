use std::io::Write;
use std::time::Instant;

use clap::{Parser, Subcommand};
use maze_core::{Direction, DEFAULT_SIZE, DEFAULT_STEP_DELAY_MS};
use maze_runner::render::render_ascii;
use maze_runner::{ReplayOutcome, RunOutcome, Session, SessionError, SimConfig};
use tokio::signal;

/// Generate perfect mazes, walk them, and watch a depth-first solver at work
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Cells per side
    #[arg(long, global = true, default_value_t = DEFAULT_SIZE)]
    size: usize,

    /// Maze seed (random when omitted)
    #[arg(long, global = true)]
    seed: Option<u32>,

    /// Solver pause between steps in ms (clamped to 50-500)
    #[arg(long, global = true, default_value_t = DEFAULT_STEP_DELAY_MS)]
    delay: u64,

    /// Print the final snapshot as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a maze and print it
    Generate,

    /// Animate the depth-first solver until it reaches the goal
    Solve {
        /// Only print the final frame
        #[arg(long)]
        quiet: bool,
    },

    /// Apply manual moves (U/R/D/L), save the path and replay it
    Walk {
        /// Moves such as "RRDDLD"
        moves: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing for debug output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = SimConfig::default()
        .with_size(cli.size)
        .with_step_delay_ms(cli.delay);
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }

    let session = match Session::new(config) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("❌ Error generating maze: {}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Generate => {
            generate_command(&session);
            Ok(())
        }
        Command::Solve { quiet } => solve_command(&session, quiet).await,
        Command::Walk { moves } => walk_command(&session, &moves).await,
    };

    if let Err(e) = result {
        eprintln!();
        eprintln!("❌ Error: {}", e);
        eprintln!("{}", "=".repeat(70));
        std::process::exit(1);
    }

    if cli.json {
        match serde_json::to_string_pretty(&session.snapshot()) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("❌ Error encoding snapshot: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn print_header(session: &Session) {
    let snapshot = session.snapshot();
    let size = snapshot.grid.size();
    println!("🔍 Maze {}x{} (seed: {})", size, size, snapshot.seed.unwrap_or_default());
    println!("{}", "=".repeat(70));
}

fn generate_command(session: &Session) {
    print_header(session);
    println!("{}", render_ascii(&session.snapshot()));
    println!("{}", "=".repeat(70));
}

async fn solve_command(session: &Session, quiet: bool) -> Result<(), SessionError> {
    print_header(session);
    let delay = session.step_delay();
    println!("🤖 Solving with depth-first backtracking ({}ms per step)...", delay.as_millis());

    let start = Instant::now();
    let mut frames = session.subscribe();
    let redraw = async {
        if quiet {
            return std::future::pending::<()>().await;
        }
        while frames.changed().await.is_ok() {
            let snapshot = frames.borrow_and_update().clone();
            // Clear screen and home the cursor before each frame
            println!("\x1b[2J\x1b[H{}", render_ascii(&snapshot));
            println!("Stack: {} positions", snapshot.solver_stack.len());
            let _ = std::io::stdout().flush();
        }
        std::future::pending::<()>().await
    };

    let run = session.run(delay);
    tokio::pin!(run, redraw);

    // Ctrl-C only requests cancellation; the run still ends on a step boundary
    let outcome = loop {
        tokio::select! {
            outcome = &mut run => break outcome?,
            _ = &mut redraw => {}
            _ = signal::ctrl_c() => {
                session.cancel();
            }
        }
    };

    println!("{}", render_ascii(&session.snapshot()));
    println!();

    match outcome {
        Some(RunOutcome::Finished { path, advances, backtracks }) => {
            println!("✅ Goal reached in {:.2}s", start.elapsed().as_secs_f64());
            println!("  Forward steps: {}", advances);
            println!("  Backtracks: {}", backtracks);
            println!("  Path length: {} cells", path.len());
        }
        Some(RunOutcome::Cancelled { at }) => {
            println!("⏹️  Solver cancelled at {}", at);
        }
        None => {
            println!("⚠️  Solver already running");
        }
    }
    println!("{}", "=".repeat(70));
    Ok(())
}

/// Move characters with whitespace stripped, so "RR DD" is four moves.
fn move_steps(moves: &str) -> Vec<char> {
    moves.chars().filter(|c| !c.is_whitespace()).collect()
}

async fn walk_command(session: &Session, moves: &str) -> Result<(), SessionError> {
    print_header(session);

    let steps = move_steps(moves);
    let mut applied = 0;
    for (i, &ch) in steps.iter().enumerate() {
        let dir: Direction = match ch.to_string().parse() {
            Ok(dir) => dir,
            Err(e) => {
                println!("  Move {}: skipped ({})", i + 1, e);
                continue;
            }
        };

        if session.move_player(dir) {
            applied += 1;
        } else {
            println!("  Move {}: {:?} blocked at {}", i + 1, dir, session.player_position());
        }
    }

    println!("👣 Applied {} of {} moves, now at {}", applied, steps.len(), session.player_position());
    if session.is_won() {
        println!("🎉 Maze completed!");
    }

    if !session.save() {
        println!("💾 Nothing to save: the player never left the entrance");
        println!("{}", "=".repeat(70));
        return Ok(());
    }

    let index = session.saved_paths().len() - 1;
    println!("💾 Saved path {}", index + 1);
    println!();
    println!("🎬 Replaying path {}...", index + 1);

    match session.select(index).await? {
        ReplayOutcome::Completed {
            final_position,
            reached_goal,
        } => {
            println!("{}", render_ascii(&session.snapshot()));
            println!();
            println!("  Replay ended at {}", final_position);
            println!(
                "  Goal reached: {}",
                if reached_goal { "Yes ✓" } else { "No ✗" }
            );
        }
        ReplayOutcome::Interrupted => println!("  Replay interrupted"),
    }
    println!("{}", "=".repeat(70));
    Ok(())
}
