use anyhow::Context;
use board_reorder::config::cli::{Command, MoveArgs};
use board_reorder::core::reorder::plan_drop;
use board_reorder::core::sequencer::StepStatus;
use board_reorder::domain::ports::ConfigProvider;
use board_reorder::utils::error::ErrorSeverity;
use board_reorder::utils::{logger, validation::Validate};
use board_reorder::{
    Board, BoardError, BoardId, BoardSession, CardId, CliConfig, DragPayload, DropTarget, ListId,
    PersistenceSequencer, RestBoardApi, TomlConfig, TracingNotifier,
};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = CliConfig::parse();

    // Flags take precedence over the config file
    if let Some(path) = config.config.clone() {
        let file = TomlConfig::from_file(&path)
            .with_context(|| format!("failed to load config file '{}'", path))?;
        if let Err(e) = file.validate() {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
        config.merge_file(&file);
    }

    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting board-reorder CLI");
    tracing::debug!("Persistence mode: {:?}", config.persistence_mode());

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if let Err(e) = run(&config).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 4,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }

    Ok(())
}

async fn run(config: &CliConfig) -> Result<(), BoardError> {
    let board_id = BoardId(config.board_id().ok_or(BoardError::MissingConfigError {
        field: "board_id".to_string(),
    })?);

    let api = RestBoardApi::from_config(config)?;
    let sequencer = PersistenceSequencer::new(api, board_id).with_mode(config.persistence_mode());
    let session = BoardSession::new(sequencer, TracingNotifier).with_optimistic_updates(config.optimistic);

    let board = session.load().await?;

    match &config.command {
        Command::Show => print_board(&board),
        Command::Plan(args) => {
            let (payload, target) = drag_from_args(&board, args)?;
            let destination = board
                .list(target.list_id)
                .ok_or(BoardError::ListNotFound {
                    list_id: target.list_id.0,
                })?
                .ordered_cards();
            let plan = plan_drop(&payload, &target, &destination);
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        Command::Move(args) => {
            let (payload, target) = drag_from_args(&board, args)?;
            let outcome = session.on_drop(payload, target).await?;

            if outcome.is_noop() {
                println!("Card {} is already in that slot", args.card);
                return Ok(());
            }

            for step in &outcome.report.steps {
                let status = match &step.status {
                    StepStatus::Applied => "applied".to_string(),
                    StepStatus::Skipped => "skipped".to_string(),
                    StepStatus::NotAttempted => "not attempted".to_string(),
                    StepStatus::Failed(e) => format!("failed: {}", e),
                };
                println!("{:<22} {:>3} updates  {}", step.kind.label(), step.update_count, status);
            }

            if let Some(board) = &outcome.report.board {
                print_board(board);
            }
            if !outcome.succeeded() {
                eprintln!("❌ Move incomplete; the board above reflects the server state");
                std::process::exit(2);
            }
        }
    }

    Ok(())
}

fn drag_from_args(board: &Board, args: &MoveArgs) -> Result<(DragPayload, DropTarget), BoardError> {
    let payload = DragPayload::capture(board, CardId(args.card))?;
    Ok((payload, DropTarget::new(ListId(args.list), args.position)))
}

fn print_board(board: &Board) {
    println!("📋 {} (board {})", board.title, board.id);
    let mut lists: Vec<_> = board.lists.iter().collect();
    lists.sort_by_key(|list| list.position);

    for list in lists {
        let marker = if list.is_contiguous() { "" } else { "  ⚠️ positions not contiguous" };
        println!("  [{}] {}{}", list.id, list.title, marker);
        for card in list.ordered_cards() {
            println!("    {:>3}  #{} {}", card.position, card.id, card.title);
        }
    }
}
