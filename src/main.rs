use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use crossbeam_channel::unbounded;
use rand::rngs::StdRng;
use rand::SeedableRng;

use parapath::graph::Graph;
use parapath::grid::Maze;
use parapath::search::{
    astar, bellman_ford, dijkstra,
    parallel::{astar as parallel_astar, delta},
    Algorithm, Heuristic, ParallelConfig, SearchContext, SearchError, SearchResult,
};

// --- Command Line Arguments ---

#[derive(Parser)]
#[command(name = "parapath")]
#[command(about = "parapath - Parallel maze shortest-path solver")]
#[command(version)]
#[command(subcommand_required = true)]
#[command(arg_required_else_help = true)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// CLI algorithm selection
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum CliAlgorithm {
    /// Serial A* search
    AStar,
    /// Serial Dijkstra search
    Dijkstra,
    /// Serial Bellman-Ford (handles negative weights in its general form)
    BellmanFord,
    /// Parallel A* with a worker pool expanding neighbors
    ParallelAStar,
    /// Delta-stepping parallel Dijkstra
    #[default]
    DeltaStepping,
}

impl From<CliAlgorithm> for Algorithm {
    fn from(cli: CliAlgorithm) -> Self {
        match cli {
            CliAlgorithm::AStar => Algorithm::AStar,
            CliAlgorithm::Dijkstra => Algorithm::Dijkstra,
            CliAlgorithm::BellmanFord => Algorithm::BellmanFord,
            CliAlgorithm::ParallelAStar => Algorithm::ParallelAStar,
            CliAlgorithm::DeltaStepping => Algorithm::DeltaStepping,
        }
    }
}

/// CLI heuristic selection
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum CliHeuristic {
    /// Manhattan distance to the goal
    #[default]
    Manhattan,
    /// Euclidean distance to the goal
    Euclidean,
}

impl From<CliHeuristic> for Heuristic {
    fn from(cli: CliHeuristic) -> Self {
        match cli {
            CliHeuristic::Manhattan => Heuristic::Manhattan,
            CliHeuristic::Euclidean => Heuristic::Euclidean,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a maze file and print the path overlay plus statistics
    Solve {
        /// Path to the maze text file (X wall, p start, G goal)
        maze: PathBuf,
        /// Algorithm to run
        #[arg(short, long, value_enum, default_value = "delta-stepping")]
        algorithm: CliAlgorithm,
        /// Worker threads for the parallel engines (default: hardware parallelism)
        #[arg(short, long)]
        workers: Option<usize>,
        /// Delta-stepping bucket width (default: derived from node count)
        #[arg(short, long)]
        delta: Option<u64>,
        /// Heuristic for the A* variants
        #[arg(long, value_enum, default_value = "manhattan")]
        heuristic: CliHeuristic,
        /// Ceiling on delta-stepping bucket indices
        #[arg(long, default_value_t = 1000)]
        bucket_ceiling: u64,
        /// Optional ceiling on parallel A* iterations
        #[arg(long)]
        round_ceiling: Option<u64>,
        /// Print the discovery order of settled nodes
        #[arg(long)]
        trace: bool,
        /// Skip the maze rendering, print statistics only
        #[arg(short, long)]
        quiet: bool,
    },
    /// Generate a random maze
    Generate {
        /// Maze width in cells
        width: usize,
        /// Maze height in cells
        height: usize,
        /// Fraction of interior cells that become walls
        #[arg(long, default_value_t = 0.2)]
        wall_density: f64,
        /// RNG seed for reproducible mazes
        #[arg(long)]
        seed: Option<u64>,
        /// Write the maze to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Compare serial and parallel runtimes over a ladder of maze sizes
    Bench {
        /// Square maze sizes to test
        #[arg(long, value_delimiter = ',', default_values_t = vec![10, 20, 30, 40])]
        sizes: Vec<usize>,
        /// Trials per size, averaged
        #[arg(long, default_value_t = 3)]
        trials: usize,
        /// Fraction of interior cells that become walls
        #[arg(long, default_value_t = 0.2)]
        wall_density: f64,
        /// Worker threads for the parallel engine
        #[arg(short, long)]
        workers: Option<usize>,
        /// Delta-stepping bucket width
        #[arg(short, long)]
        delta: Option<u64>,
        /// Compare A* variants instead of the Dijkstra variants
        #[arg(long)]
        astar: bool,
        /// RNG seed for reproducible mazes
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Append results as CSV to this file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    let result = match args.command {
        Commands::Solve {
            maze,
            algorithm,
            workers,
            delta,
            heuristic,
            bucket_ceiling,
            round_ceiling,
            trace,
            quiet,
        } => run_solve(
            &maze,
            algorithm,
            workers,
            delta,
            heuristic.into(),
            bucket_ceiling,
            round_ceiling,
            trace,
            quiet,
        ),
        Commands::Generate {
            width,
            height,
            wall_density,
            seed,
            output,
        } => run_generate(width, height, wall_density, seed, output),
        Commands::Bench {
            sizes,
            trials,
            wall_density,
            workers,
            delta,
            astar,
            seed,
            csv,
        } => run_bench(&sizes, trials, wall_density, workers, delta, astar, seed, csv),
    };
    if let Err(err) = result {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

#[allow(clippy::too_many_arguments)]
fn run_solve(
    maze_path: &PathBuf,
    algorithm: CliAlgorithm,
    workers: Option<usize>,
    delta: Option<u64>,
    heuristic: Heuristic,
    bucket_ceiling: u64,
    round_ceiling: Option<u64>,
    trace: bool,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let maze = Maze::from_file(maze_path)?;
    let graph = Arc::new(Graph::from_maze(&maze));
    let start = graph.start().ok_or("maze has no start cell ('p')")?;
    let goal = graph.goal().ok_or("maze has no goal cell ('G')")?;

    let mut config = ParallelConfig::default()
        .with_heuristic(heuristic)
        .with_bucket_ceiling(bucket_ceiling);
    if let Some(workers) = workers {
        config = config.with_workers(workers);
    }
    if let Some(delta) = delta {
        config = config.with_delta(delta);
    }
    if let Some(ceiling) = round_ceiling {
        config = config.with_round_ceiling(ceiling);
    }

    let (events_tx, events_rx) = unbounded();
    let mut ctx = SearchContext::new();
    if trace {
        ctx = ctx.with_events(events_tx);
    } else {
        drop(events_tx);
    }

    let result = run_algorithm(algorithm.into(), &graph, start, goal, heuristic, &config, &ctx);
    drop(ctx);

    match result {
        Ok(result) => {
            if !quiet {
                let cells: Vec<(usize, usize)> =
                    result.path.iter().map(|&id| graph.coords(id)).collect();
                println!("{}", maze.render_with_path(&cells));
            }
            print!("{}", result);
            if trace {
                let order: Vec<String> = events_rx
                    .iter()
                    .map(|e| format!("{}:{}", e.order, e.node))
                    .collect();
                println!("Discovery order ({} settled): {}", order.len(), order.join(" "));
            }
            Ok(())
        }
        Err(SearchError::NoPathFound) => {
            println!("No path found!");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

fn run_algorithm(
    algorithm: Algorithm,
    graph: &Arc<Graph>,
    start: parapath::NodeId,
    goal: parapath::NodeId,
    heuristic: Heuristic,
    config: &ParallelConfig,
    ctx: &SearchContext,
) -> Result<SearchResult, SearchError> {
    match algorithm {
        Algorithm::AStar => astar::search(graph, start, goal, heuristic, ctx),
        Algorithm::Dijkstra => dijkstra::search(graph, start, goal, ctx),
        Algorithm::BellmanFord => bellman_ford::search(graph, start, goal, ctx),
        Algorithm::ParallelAStar => parallel_astar::search(graph, start, goal, config, ctx),
        Algorithm::DeltaStepping => delta::search(graph, start, goal, config, ctx),
    }
}

fn run_generate(
    width: usize,
    height: usize,
    wall_density: f64,
    seed: Option<u64>,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    if width < 2 || height < 2 {
        return Err("maze must be at least 2x2".into());
    }
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let maze = Maze::generate(width, height, wall_density, &mut rng);
    match output {
        Some(path) => {
            fs::write(&path, maze.to_string())?;
            println!("Wrote {}x{} maze to {}", width, height, path.display());
        }
        None => print!("{}", maze),
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_bench(
    sizes: &[usize],
    trials: usize,
    wall_density: f64,
    workers: Option<usize>,
    delta: Option<u64>,
    compare_astar: bool,
    seed: u64,
    csv: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = ParallelConfig::default();
    if let Some(workers) = workers {
        config = config.with_workers(workers);
    }
    if let Some(delta) = delta {
        config = config.with_delta(delta);
    }
    let (serial_name, parallel_name) = if compare_astar {
        ("a-star", "parallel-a-star")
    } else {
        ("dijkstra", "delta-stepping")
    };

    println!(
        "Comparing {} vs {} ({} workers, {} trials per size)",
        serial_name,
        parallel_name,
        config.worker_count(),
        trials
    );
    let mut csv_rows = vec!["size,serial_secs,parallel_secs,speedup".to_string()];

    for (i, &size) in sizes.iter().enumerate() {
        let graph = solvable_maze(size, wall_density, seed.wrapping_add(i as u64))?;
        let start = graph.start().ok_or("generated maze lost its start")?;
        let goal = graph.goal().ok_or("generated maze lost its goal")?;

        let mut serial_total = Duration::ZERO;
        let mut parallel_total = Duration::ZERO;
        for _ in 0..trials {
            let ctx = SearchContext::new();
            let serial = if compare_astar {
                astar::search(&graph, start, goal, config.heuristic, &ctx)?
            } else {
                dijkstra::search(&graph, start, goal, &ctx)?
            };
            serial_total += serial.statistics.elapsed_time;

            let parallel = if compare_astar {
                parallel_astar::search(&graph, start, goal, &config, &ctx)?
            } else {
                delta::search(&graph, start, goal, &config, &ctx)?
            };
            parallel_total += parallel.statistics.elapsed_time;

            if serial.cost != parallel.cost {
                return Err(format!(
                    "cost mismatch on {}x{} maze: serial {} vs parallel {}",
                    size, size, serial.cost, parallel.cost
                )
                .into());
            }
        }

        let serial_secs = serial_total.as_secs_f64() / trials as f64;
        let parallel_secs = parallel_total.as_secs_f64() / trials as f64;
        let speedup = if parallel_secs > 0.0 {
            serial_secs / parallel_secs
        } else {
            1.0
        };
        println!(
            "{:>4}x{:<4} serial {:>10.6}s  parallel {:>10.6}s  speedup {:>5.2}x",
            size, size, serial_secs, parallel_secs, speedup
        );
        csv_rows.push(format!(
            "{},{:.6},{:.6},{:.3}",
            size, serial_secs, parallel_secs, speedup
        ));
    }

    if let Some(path) = csv {
        fs::write(&path, csv_rows.join("\n") + "\n")?;
        println!("Results saved to {}", path.display());
    }
    Ok(())
}

/// Generate mazes until one is solvable, bumping the seed each attempt.
fn solvable_maze(
    size: usize,
    wall_density: f64,
    seed: u64,
) -> Result<Arc<Graph>, Box<dyn std::error::Error>> {
    const ATTEMPTS: u64 = 64;
    for attempt in 0..ATTEMPTS {
        let mut rng = StdRng::seed_from_u64(seed.wrapping_add(attempt * 7919));
        let maze = Maze::generate(size, size, wall_density, &mut rng);
        let graph = Arc::new(Graph::from_maze(&maze));
        let (Some(start), Some(goal)) = (graph.start(), graph.goal()) else {
            continue;
        };
        if dijkstra::search(&graph, start, goal, &SearchContext::new()).is_ok() {
            return Ok(graph);
        }
    }
    Err(format!(
        "no solvable {}x{} maze found at density {} after {} attempts",
        size, size, wall_density, ATTEMPTS
    )
    .into())
}
