use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::Parser;
use dialoguer::Confirm;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use waste_ledger::{cli, config, error, image_ref, session, store};
use waste_ledger_common::{
    landfill_count, monthly_breakdown, parse_weight_grams, RuleCatalog, ScanRecord,
};
use cli::{Cli, Commands, Verdict};
use config::Config;
use error::WasteLedgerError;
use session::Session;
use store::FileStore;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "waste_ledger=debug,waste_ledger_common=debug"
    } else {
        "waste_ledger=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = Config::load().context("設定ファイルの読み込みに失敗")?;

    let store_dir = config.store_dir()?;
    let mut session = Session::open(FileStore::new(&store_dir));

    match cli.command {
        Commands::Scan { image, category, ideas } => {
            persist_warning(session.begin_classification());

            let catalog = config.load_catalog().context("ルールカタログの読み込みに失敗")?;
            let image_ref = image_ref::encode_data_uri(&image)?;
            let Some(rule) = catalog.lookup(&category).cloned() else {
                return Err(WasteLedgerError::UnknownCategory(category).into());
            };

            let record = ScanRecord::new(category, image_ref, rule, Utc::now().timestamp_millis());
            println!("✔ 履歴に追加しました: {}\n", record.id());
            print_record(&record);

            if !ideas.is_empty() {
                println!("  再利用アイデア:");
                for idea in &ideas {
                    println!("    - {}", idea);
                }
            }

            persist_warning(session.append(record));
        }

        Commands::Weight { id, grams } => {
            let weight_kg = parse_weight_grams(&grams).map_err(|e| match e {
                waste_ledger_common::Error::InvalidWeight(msg) => WasteLedgerError::InvalidWeight(msg),
                other => other.into(),
            })?;

            if session.find(&id).is_none() {
                println!("履歴に見つかりません（削除済みの可能性があります）: {}", id);
            } else {
                persist_warning(session.update_weight(&id, weight_kg));
                println!("✔ 重量を保存しました: {} ({} kg)", id, weight_kg);
            }
            println!("  転換量: {:.2} kg", session.waste_diverted_kg());
        }

        Commands::Feedback { verdict } => {
            match verdict {
                Verdict::Correct => persist_warning(session.record_correct()),
                Verdict::Incorrect => persist_warning(session.record_incorrect()),
            }
            println!("✔ フィードバックありがとうございます");
            println!("  正答率: {:.1}%", session.accuracy());
        }

        Commands::History { limit } => {
            let limit = limit.unwrap_or(config.history_page_size);
            let history = session.history();

            if history.is_empty() {
                println!("履歴はありません");
            } else {
                println!("履歴 ({}件中{}件):", history.len(), limit.min(history.len()));
                for record in history.iter().take(limit) {
                    let weight = record
                        .weight_kg()
                        .map(|w| format!(" {} kg", w))
                        .unwrap_or_default();
                    println!(
                        "  {}  {}  [{}]{}  {}",
                        format_timestamp(record.timestamp()),
                        record.category(),
                        record.rule().action,
                        weight,
                        record.id()
                    );
                }
            }
        }

        Commands::Show { id } => {
            let selected = match session.select(&id) {
                Ok(selected) => selected,
                Err(e @ WasteLedgerError::Persist(_)) => {
                    persist_warning(Err(e));
                    session.active_item().cloned()
                }
                Err(e) => return Err(e.into()),
            };
            let record = selected.ok_or(WasteLedgerError::RecordNotFound(id))?;
            print_record(&record);
        }

        Commands::Active { reset } => {
            if reset {
                persist_warning(session.reset_view());
                println!("✔ 表示中アイテムを解除しました");
            } else {
                match session.active_item() {
                    Some(record) => print_record(record),
                    None => println!("表示中のアイテムはありません"),
                }
            }
        }

        Commands::Stats { months } => {
            let history = session.history();
            println!("集計:");
            println!("  分類件数: {}", session.items_sorted());
            println!("  転換量: {:.2} kg", session.waste_diverted_kg());
            println!("  正答率: {:.1}%", session.accuracy());
            println!("  埋立・特別回収: {}件", landfill_count(history));

            println!("\n月別（リサイクル / 堆肥化）:");
            for tally in monthly_breakdown(history, Utc::now(), months) {
                println!("  {}  {:>3} / {:>3}", tally.month_key, tally.recycled, tally.composted);
            }
        }

        Commands::Clear { yes } => {
            let confirmed = yes
                || Confirm::new()
                    .with_prompt("履歴・カウンタ・フィードバックをすべて削除しますか？")
                    .default(false)
                    .interact()
                    .context("確認の入力に失敗")?;

            if confirmed {
                persist_warning(session.clear());
                println!("✔ 履歴を削除しました");
            } else {
                println!("中止しました");
            }
        }

        Commands::Rules => {
            let catalog = config.load_catalog().context("ルールカタログの読み込みに失敗")?;
            for (category, rule) in catalog.iter() {
                println!("{} [{}]", category, rule.action);
                println!("  準備: {}", rule.preparation);
                println!("  備考: {}", rule.notes);
                println!("  出典: {}", rule.source);
            }
        }

        Commands::Config { set_store_dir, set_rules, show } => {
            if let Some(dir) = set_store_dir {
                config.set_store_dir(dir)?;
                println!("✔ 保存先を設定しました");
            }
            if let Some(path) = set_rules {
                config.set_rules_path(path)?;
                println!("✔ ルールカタログを設定しました");
            }
            if show {
                println!("設定:");
                println!("  保存先: {}", config.store_dir()?.display());
                println!(
                    "  ルール: {}",
                    config
                        .rules_path
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "組み込み".into())
                );
                println!("  履歴表示件数: {}", config.history_page_size);
            }
        }
    }

    Ok(())
}

/// 保存失敗は警告ログに残し、処理は続ける
fn persist_warning(result: error::Result<()>) {
    if let Err(e) = result {
        warn!("{}", e);
    }
}

fn format_timestamp(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| millis.to_string())
}

fn print_record(record: &ScanRecord) {
    let rule = record.rule();
    println!("{} [{}]", record.category(), rule.action);
    println!("  ID: {}", record.id());
    println!("  日時: {}", format_timestamp(record.timestamp()));
    if let Some(weight) = record.weight_kg() {
        println!("  重量: {} kg", weight);
    }
    println!("  準備: {}", rule.preparation);
    println!("  備考: {}", rule.notes);
    println!("  出典: {}", rule.source);
}
