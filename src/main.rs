//! Emoji Dash entry point
//!
//! Native builds run a line-based terminal version of the game. The browser
//! build lives in the library (`web` module) and is driven from JavaScript.

#[cfg(not(target_arch = "wasm32"))]
mod terminal {
    use std::io::{self, BufRead, Write};
    use std::path::{Path, PathBuf};
    use std::sync::mpsc::{self, RecvTimeoutError};
    use std::thread;
    use std::time::Duration;

    use emoji_dash::consts::*;
    use emoji_dash::platform::now_secs;
    use emoji_dash::sim::EventOutcome;
    use emoji_dash::{CardComposer, GameEvent, Session, SessionStatus, Settings, TapOutcome};

    /// How often the sprint clock is checked while waiting for input
    const POLL_INTERVAL: Duration = Duration::from_millis(250);

    /// A parsed input line
    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Command {
        Event(GameEvent),
        Name(String),
        Card(Option<PathBuf>),
        Status,
        Help,
        Quit,
    }

    fn parse(line: &str) -> Result<Command, String> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_ascii_lowercase().as_str() {
            "" | "status" | "s" => Ok(Command::Status),
            "start" => Ok(Command::Event(GameEvent::Start)),
            "reset" => Ok(Command::Event(GameEvent::Reset)),
            "tap" | "t" => rest
                .parse()
                .map(|cell| Command::Event(GameEvent::Tap(cell)))
                .map_err(|_| format!("tap needs a cell number, got {rest:?}")),
            "name" => Ok(Command::Name(rest.to_string())),
            "card" => Ok(Command::Card((!rest.is_empty()).then(|| PathBuf::from(rest)))),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => other
                .parse()
                .map(|cell| Command::Event(GameEvent::Tap(cell)))
                .map_err(|_| format!("unknown command {other:?} (try `help`)")),
        }
    }

    fn print_help() {
        println!("{HOW_TO_PLAY}");
        println!("Commands: start | <cell> or tap <cell> | reset | name <nick> | card [path] | status | quit");
    }

    fn print_board(session: &Session, now: f64) {
        println!(
            "⏱️ {}s left   ⭐ {} hits / {} taps   [{}]",
            session.remaining_seconds(now),
            session.score,
            session.round_count,
            session.status.as_str()
        );
        for row in session.grid.chunks(GRID_SIZE) {
            let line: Vec<String> = row
                .iter()
                .map(|cell| format!("{:>2}:{}", cell.index, cell.symbol))
                .collect();
            println!("  {}", line.join("  "));
        }
    }

    fn write_card(composer: &CardComposer, session: &Session, path: &Path) {
        // Snapshot first so the card matches what was on screen
        let request = session.card_request();
        let card = composer.compose(&request);
        match card.save(path) {
            Ok(()) => println!(
                "🖼️ Share card for {} ({} taps) saved to {}",
                if request.name.is_empty() { "Anon" } else { request.name.as_str() },
                request.score,
                path.display()
            ),
            Err(err) => {
                log::error!("Could not write share card: {}", err);
                println!("Could not write share card: {err}");
            }
        }
    }

    pub fn run() {
        let settings_path = std::env::args()
            .nth(1)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(Settings::FILE_NAME));
        let settings = Settings::load_or_default(&settings_path);
        let composer = settings.composer();

        let mut session = Session::new(settings.seed_or_random());
        session.set_player_name(&settings.player_name);

        println!("{TITLE}");
        println!("{TAGLINE}");
        print_help();
        print_board(&session, now_secs());

        // stdin blocks, so it gets its own thread; the main loop keeps ticking
        let (tx, rx) = mpsc::channel::<String>();
        thread::spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        });

        loop {
            let line = match rx.recv_timeout(POLL_INTERVAL) {
                Ok(line) => line,
                Err(RecvTimeoutError::Timeout) => {
                    let now = now_secs();
                    if session.tick(now) {
                        println!("\n⏰ Time's up! {} taps on ⭐. Type `card` to save a share card.", session.score);
                        print_board(&session, now);
                    }
                    continue;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            };

            let command = match parse(&line) {
                Ok(command) => command,
                Err(msg) => {
                    println!("{msg}");
                    continue;
                }
            };

            let now = now_secs();
            match command {
                Command::Event(event) => {
                    match session.handle(event, now) {
                        EventOutcome::Started => println!("▶️ Go! Tap the ⭐"),
                        EventOutcome::Tapped(TapOutcome::Hit) => println!("✅ Hit!"),
                        EventOutcome::Tapped(TapOutcome::Miss) => println!("❌ Miss"),
                        EventOutcome::Tapped(TapOutcome::Rejected) | EventOutcome::Ignored => {
                            match (event, session.status) {
                                (GameEvent::Start, SessionStatus::Running) => {
                                    println!("Already running")
                                }
                                (GameEvent::Tap(_), SessionStatus::Running) => {
                                    println!("No such cell")
                                }
                                _ => println!("Press start first"),
                            }
                        }
                        EventOutcome::Expired => println!("⏰ Too late, time's up!"),
                        EventOutcome::Reset => println!("🔁 Reset"),
                    }
                    print_board(&session, now);
                }
                Command::Name(name) => {
                    session.set_player_name(&name);
                    println!("Nickname set to {:?}", session.player_name);
                }
                Command::Card(path) => {
                    let path = path.unwrap_or_else(|| settings.card_path.clone());
                    write_card(&composer, &session, &path);
                }
                Command::Status => print_board(&session, now),
                Command::Help => print_help(),
                Command::Quit => break,
            }
            let _ = io::stdout().flush();
        }
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Emoji Dash (native) starting...");
    terminal::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is emoji_dash::web, this is just to satisfy the compiler
}
