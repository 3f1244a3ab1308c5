//! Line-oriented terminal frontend.
//!
//! Reads one command per line from stdin and prints runtime events as they
//! arrive. Parsing and rendering are pure so they can be tested without a
//! terminal.
use std::fmt::Write as _;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

use glyph_core::{CombineOutcome, CommitOutcome, InstanceId, SelectionChange, SplitOutcome, Token};
use runtime::{
    Event, OperationEvent, PoolEvent, ProgressEvent, RuntimeHandle, SessionSnapshot, Topic,
};

pub const HELP: &str = "\
commands:
  pool            show the pool and the tokens lying around
  pick <token>    pick up a token
  sel <id>...     toggle selection of instances (e.g. `sel 0 3`)
  split           split the selected token
  combine         combine the two selected tokens
  done            finish a pending reward animation
  restart         reset the level
  next            go to the next level once this one is complete
  status          level progress
  dump            print the session snapshot as JSON
  help            this text
  quit            leave";

/// One parsed command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Input {
    Pool,
    Pick(Token),
    Select(Vec<InstanceId>),
    Split,
    Combine,
    Done,
    Restart,
    Next,
    Status,
    Dump,
    Help,
    Quit,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("unknown command `{0}`, try `help`")]
    Unknown(String),

    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),

    #[error("`{0}` is not an instance id")]
    BadId(String),
}

/// Parses a command line. Blank lines yield `None`.
pub fn parse_input(line: &str) -> Result<Option<Input>, InputError> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(None);
    };

    let input = match command {
        "pool" | "p" => Input::Pool,
        "pick" => {
            let token = words.next().ok_or(InputError::MissingArgument("pick"))?;
            Input::Pick(Token::from(token))
        }
        "sel" | "s" => {
            let ids = words.map(parse_id).collect::<Result<Vec<_>, _>>()?;
            if ids.is_empty() {
                return Err(InputError::MissingArgument("sel"));
            }
            Input::Select(ids)
        }
        "split" => Input::Split,
        "combine" => Input::Combine,
        "done" => Input::Done,
        "restart" => Input::Restart,
        "next" => Input::Next,
        "status" => Input::Status,
        "dump" => Input::Dump,
        "help" | "?" => Input::Help,
        "quit" | "exit" | "q" => Input::Quit,
        other => return Err(InputError::Unknown(other.to_owned())),
    };
    Ok(Some(input))
}

fn parse_id(word: &str) -> Result<InstanceId, InputError> {
    word.trim_start_matches('#')
        .parse()
        .map(InstanceId)
        .map_err(|_| InputError::BadId(word.to_owned()))
}

/// Renders a runtime event as one line of text.
pub fn render_event(event: &Event) -> String {
    match event {
        Event::Pool(PoolEvent { added, removed, .. }) => {
            let mut line = String::from("pool:");
            for id in removed {
                let _ = write!(line, " -{id}");
            }
            for entry in added {
                let _ = write!(line, " +{} {}", entry.id, entry.token);
            }
            line
        }
        Event::Operation(OperationEvent { outcome, .. }) => render_outcome(outcome),
        Event::Progress(ProgressEvent::LevelStarted { index, name }) => {
            format!("== level {}: {name} ==", index + 1)
        }
        Event::Progress(ProgressEvent::TargetCompleted { token, .. }) => {
            format!("target {token} completed!")
        }
        Event::Progress(ProgressEvent::LevelCompleted { .. }) => "level complete!".to_owned(),
        Event::Progress(ProgressEvent::CampaignCompleted) => {
            "campaign complete, thanks for playing".to_owned()
        }
    }
}

fn render_outcome(outcome: &CommitOutcome) -> String {
    match outcome {
        CommitOutcome::Split(SplitOutcome::Applied(applied)) => {
            let (a, b) = applied.parts();
            format!("split {} -> {a} {b}", applied.consumed.token)
        }
        CommitOutcome::Combine(CombineOutcome::Applied(applied)) => {
            let [first, second] = &applied.consumed;
            let suffix = if applied.is_target { " (target!)" } else { "" };
            format!(
                "combine {}+{} -> {}{suffix}",
                first.token, second.token, applied.result
            )
        }
        CommitOutcome::Split(SplitOutcome::Rejected(reason)) => format!("split rejected: {reason}"),
        CommitOutcome::Combine(CombineOutcome::Rejected(reason)) => {
            format!("combine rejected: {reason}")
        }
    }
}

/// Renders the pool, marking selected instances with `*`.
pub fn render_pool(snapshot: &SessionSnapshot) -> String {
    let puzzle = &snapshot.puzzle;
    let mut out = String::from("pool:");
    if puzzle.pool.is_empty() {
        out.push_str(" (empty)");
    }
    for entry in &puzzle.pool {
        let mark = if puzzle.selected.contains(&entry.id) { "*" } else { "" };
        let _ = write!(out, " [{} {}]{mark}", entry.id, entry.token);
    }
    if !snapshot.level.pickups.is_empty() {
        out.push_str("\naround:");
        for token in &snapshot.level.pickups {
            let _ = write!(out, " {token}");
        }
    }
    out
}

/// Renders level progress.
pub fn render_status(snapshot: &SessionSnapshot) -> String {
    let level = &snapshot.level;
    let puzzle = &snapshot.puzzle;
    let mut out = format!("level {}/{}: {}", level.index + 1, level.count, level.name);

    let _ = write!(out, "\ntargets left: {}", join_tokens(&puzzle.remaining_targets));
    let _ = write!(out, "\ncompleted: {}", join_tokens(&puzzle.completed_targets));
    let _ = write!(
        out,
        "\nselection: {}/{} ({})",
        puzzle.selected.len(),
        puzzle.max_selection,
        puzzle.eligibility
    );
    if let Some(pending) = &puzzle.pending_reward {
        let _ = write!(out, "\nreward pending: {pending} (type `done` if it does not arrive)");
    }
    if puzzle.complete {
        out.push_str("\nlevel complete");
    }
    if snapshot.campaign_complete {
        out.push_str("\ncampaign complete");
    }
    out
}

fn join_tokens<'a>(tokens: impl IntoIterator<Item = &'a Token>) -> String {
    tokens
        .into_iter()
        .map(Token::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Runs the input loop until `quit` or end of input.
pub async fn run(handle: RuntimeHandle) -> Result<()> {
    let mut pool_rx = handle.subscribe(Topic::Pool);
    let mut operation_rx = handle.subscribe(Topic::Operation);
    let mut progress_rx = handle.subscribe(Topic::Progress);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let snapshot = handle.snapshot().await?;
    println!("{}", render_status(&snapshot));
    println!("{}", render_pool(&snapshot));
    println!("type `help` for commands");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("stdin closed");
                    break;
                };
                match parse_input(&line) {
                    Ok(Some(Input::Quit)) => break,
                    Ok(Some(input)) => {
                        if let Err(error) = execute(&handle, input).await {
                            warn!(%error, "command failed");
                            println!("error: {error}");
                        }
                    }
                    Ok(None) => {}
                    Err(error) => println!("{error}"),
                }
            }
            Ok(event) = pool_rx.recv() => println!("{}", render_event(&event)),
            Ok(event) = operation_rx.recv() => println!("{}", render_event(&event)),
            Ok(event) = progress_rx.recv() => println!("{}", render_event(&event)),
        }
    }

    Ok(())
}

async fn execute(handle: &RuntimeHandle, input: Input) -> Result<()> {
    match input {
        Input::Pool => println!("{}", render_pool(&handle.snapshot().await?)),
        Input::Pick(token) => {
            handle.acquire(token).await?;
        }
        Input::Select(ids) => {
            for id in ids {
                match handle.toggle(id).await? {
                    SelectionChange::Selected => println!("selected {id}"),
                    SelectionChange::Deselected => println!("deselected {id}"),
                    SelectionChange::CapacityReached => println!("selection full, {id} ignored"),
                    SelectionChange::Unchanged => {}
                }
            }
        }
        Input::Split => {
            handle.request_split().await?;
        }
        Input::Combine => {
            handle.request_combine().await?;
        }
        Input::Done => match handle.snapshot().await?.puzzle.pending_reward {
            Some(token) => {
                handle.finalize_reward(token).await?;
            }
            None => println!("no reward pending"),
        },
        Input::Restart => {
            handle.restart().await?;
            println!("level restarted");
        }
        Input::Next => {
            handle.advance_level().await?;
        }
        Input::Status => println!("{}", render_status(&handle.snapshot().await?)),
        Input::Dump => println!("{}", serde_json::to_string_pretty(&handle.snapshot().await?)?),
        Input::Help => println!("{HELP}"),
        Input::Quit => {}
    }
    Ok(())
}
