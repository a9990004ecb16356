mod interactive;

use gridhunt_agents::{alpha_beta, minimax, Agent, AgentConfig, Evaluation, RandomAgent, SearchError};
use gridhunt_core::{layouts, GameState, Layout, Position, PLAYER};
use std::env;
use std::time::Instant;

fn main() {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        None => play_interactive("small"),
        Some("play") => {
            let name = args.get(2).map(String::as_str).unwrap_or("small");
            play_interactive(name);
        }
        Some("run") => run_games(&args[2..]),
        Some("bench") => bench(&args[2..]),
        Some("layouts") => list_layouts(),
        Some("help") | Some("--help") => print_usage(&args[0]),
        Some(other) => {
            eprintln!("Unknown command: {other}");
            print_usage(&args[0]);
        }
    }
}

fn print_usage(program: &str) {
    println!("Usage: {program} [command]");
    println!();
    println!("Commands:");
    println!("  play [layout]      Play interactively (default)");
    println!("  run [options]      Let an agent play by itself");
    println!("  bench [options]    Compare minimax and alpha-beta node counts");
    println!("  layouts            List built-in layouts");
    println!("  help               Show this message");
    println!();
    println!("Run options:");
    println!("  --agent <name>     minimax | alphabeta | expectimax | reflex | random");
    println!("  --eval <name>      score | proximity");
    println!("  --depth <n>        Look-ahead depth in plies (default 2)");
    println!("  --layout <name>    Built-in layout (default small)");
    println!("  --games <n>        Number of games to play (default 1)");
    println!("  --quiet            Skip per-ply board output");
    println!();
    println!("Bench options: --layout <name>, --depth <n>, --eval <name>");
}

fn load_layout(name: &str) -> Option<Layout> {
    let text = match layouts::named(name) {
        Some(text) => text,
        None => {
            eprintln!("Unknown layout: {name} (try `layouts`)");
            return None;
        }
    };
    match Layout::parse(text) {
        Ok(layout) => Some(layout),
        Err(e) => {
            eprintln!("Error parsing layout {name}: {e}");
            None
        }
    }
}

fn play_interactive(layout_name: &str) {
    let layout = match load_layout(layout_name) {
        Some(layout) => layout,
        None => return,
    };
    if let Err(e) = interactive::InteractiveGame::new(layout).run() {
        eprintln!("Terminal error: {e}");
    }
}

fn list_layouts() {
    for name in layouts::NAMES {
        if let Some(text) = layouts::named(name) {
            match Layout::parse(text) {
                Ok(layout) => println!(
                    "{name}: {}x{}, {} ghosts, {} pellets, {} capsules",
                    layout.width,
                    layout.height,
                    layout.ghost_starts.len(),
                    layout.pellets.len(),
                    layout.capsules.len()
                ),
                Err(e) => eprintln!("{name}: broken layout ({e})"),
            }
        }
    }
}

fn run_games(args: &[String]) {
    let mut config = AgentConfig::default();
    let mut layout_name = String::from("small");
    let mut games = 1u32;
    let mut quiet = false;

    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        if flag == "--quiet" {
            quiet = true;
            i += 1;
            continue;
        }
        let value = match args.get(i + 1) {
            Some(value) => value,
            None => {
                eprintln!("Missing value for {flag}");
                return;
            }
        };
        match flag {
            "--agent" => match value.parse() {
                Ok(algorithm) => config.algorithm = algorithm,
                Err(e) => {
                    eprintln!("{e}");
                    return;
                }
            },
            "--eval" => match value.parse() {
                Ok(evaluation) => config.evaluation = evaluation,
                Err(e) => {
                    eprintln!("{e}");
                    return;
                }
            },
            "--depth" => match value.parse() {
                Ok(depth) => config.depth = depth,
                Err(_) => {
                    eprintln!("Invalid depth: {value}");
                    return;
                }
            },
            "--games" => match value.parse() {
                Ok(n) => games = n,
                Err(_) => {
                    eprintln!("Invalid game count: {value}");
                    return;
                }
            },
            "--layout" => layout_name = value.clone(),
            _ => {
                eprintln!("Unknown flag: {flag}");
                return;
            }
        }
        i += 2;
    }

    let layout = match load_layout(&layout_name) {
        Some(layout) => layout,
        None => return,
    };
    let mut agent = match config.build() {
        Ok(agent) => agent,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return;
        }
    };

    println!("{} on {layout_name}, {games} game(s)", agent.name());

    let mut wins = 0u32;
    let mut total_score = 0.0;
    for game in 1..=games {
        let start = Instant::now();
        let end = match play_game(&layout, agent.as_mut(), quiet) {
            Ok(state) => state,
            Err(e) => {
                eprintln!("Game {game} aborted: {e}");
                return;
            }
        };
        let outcome = if end.is_win() { "won" } else { "lost" };
        println!(
            "Game {game}: {outcome} with score {:.0} in {:.2}s",
            end.score(),
            start.elapsed().as_secs_f64()
        );
        if end.is_win() {
            wins += 1;
        }
        total_score += end.score();
    }

    println!();
    println!("Average score: {:.1}", total_score / f64::from(games));
    println!("Win rate: {wins}/{games}");
}

fn play_game(
    layout: &Layout,
    agent: &mut dyn Agent,
    quiet: bool,
) -> Result<GameState, SearchError> {
    let mut state = GameState::new(layout.clone());
    let mut ghosts: Vec<RandomAgent> = (1..state.num_agents()).map(RandomAgent::for_agent).collect();

    if !quiet {
        render(&state);
    }

    while !state.is_win() && !state.is_lose() {
        let action = agent.choose_action(&state)?;
        state = state.generate_successor(PLAYER, action)?;

        for (i, ghost) in ghosts.iter_mut().enumerate() {
            if state.is_win() || state.is_lose() {
                break;
            }
            let action = ghost.choose_action(&state)?;
            state = state.generate_successor(i + 1, action)?;
        }

        if !quiet {
            render(&state);
        }
    }

    Ok(state)
}

fn render(state: &GameState) {
    let layout = state.layout();
    for y in 0..layout.height {
        let mut line = String::with_capacity(layout.width);
        for x in 0..layout.width {
            line.push(tile(state, Position::new(x as i32, y as i32)));
        }
        println!("{line}");
    }
    println!(
        "Score: {:.0}   Pellets left: {}",
        state.score(),
        state.pellets_left()
    );
    println!();
}

fn tile(state: &GameState, pos: Position) -> char {
    if state.agent_position(PLAYER) == pos {
        return '@';
    }
    for ghost in 1..state.num_agents() {
        if state.agent_position(ghost) == pos {
            return if state.fright_moves(ghost) > 0 { 'f' } else { 'G' };
        }
    }
    if state.layout().is_wall(pos) {
        '%'
    } else if state.has_pellet(pos) {
        '.'
    } else if state.capsules().contains(&pos) {
        'o'
    } else {
        ' '
    }
}

fn bench(args: &[String]) {
    let mut layout_name = String::from("small");
    let mut max_depth = 3u32;
    let mut evaluation = Evaluation::Score;

    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        let value = match args.get(i + 1) {
            Some(value) => value,
            None => {
                eprintln!("Missing value for {flag}");
                return;
            }
        };
        match flag {
            "--layout" => layout_name = value.clone(),
            "--depth" => match value.parse() {
                Ok(depth) => max_depth = depth,
                Err(_) => {
                    eprintln!("Invalid depth: {value}");
                    return;
                }
            },
            "--eval" => match value.parse() {
                Ok(e) => evaluation = e,
                Err(e) => {
                    eprintln!("{e}");
                    return;
                }
            },
            _ => {
                eprintln!("Unknown flag: {flag}");
                return;
            }
        }
        i += 2;
    }

    let layout = match load_layout(&layout_name) {
        Some(layout) => layout,
        None => return,
    };
    let state = GameState::new(layout);
    let eval = evaluation.function();

    println!("Search comparison on {layout_name} ({evaluation} evaluation)");
    for depth in 1..=max_depth {
        let start = Instant::now();
        let plain = match minimax(&state, depth, eval) {
            Ok(result) => result,
            Err(e) => {
                eprintln!("minimax failed at depth {depth}: {e}");
                return;
            }
        };
        let plain_time = start.elapsed();

        let start = Instant::now();
        let pruned = match alpha_beta(&state, depth, eval) {
            Ok(result) => result,
            Err(e) => {
                eprintln!("alpha-beta failed at depth {depth}: {e}");
                return;
            }
        };
        let pruned_time = start.elapsed();

        println!(
            "depth {depth}: value {:.1} | minimax {} nodes in {:.1}ms | alpha-beta {} nodes in {:.1}ms",
            plain.value,
            plain.nodes,
            plain_time.as_secs_f64() * 1000.0,
            pruned.nodes,
            pruned_time.as_secs_f64() * 1000.0
        );
    }
}
