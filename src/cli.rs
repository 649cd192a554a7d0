use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use waste_ledger_common::{DEFAULT_MONTHS, MAX_MONTHS};

#[derive(Parser)]
#[command(name = "waste-ledger")]
#[command(about = "ごみ分別スキャン履歴・環境インパクト集計ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 分類結果を履歴に追加
    Scan {
        /// 画像ファイル
        #[arg(required = true)]
        image: PathBuf,

        /// 分類されたカテゴリ名（例: "PET Bottle"）
        #[arg(short, long)]
        category: String,

        /// 再利用アイデア（複数指定可）
        #[arg(long = "idea")]
        ideas: Vec<String>,
    },

    /// 記録の重量を設定（グラム）
    Weight {
        /// 記録ID
        #[arg(required = true)]
        id: String,

        /// 重量（g）
        #[arg(required = true, allow_hyphen_values = true)]
        grams: String,
    },

    /// 分類の正誤をフィードバック
    Feedback {
        #[arg(value_enum)]
        verdict: Verdict,
    },

    /// 履歴を表示
    History {
        /// 表示件数（省略時は設定値）
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// 記録の詳細を表示（表示中アイテムに設定）
    Show {
        #[arg(required = true)]
        id: String,
    },

    /// 表示中アイテムを表示
    Active {
        /// 表示中アイテムを解除
        #[arg(long)]
        reset: bool,
    },

    /// 集計を表示
    Stats {
        /// 月別集計の月数
        #[arg(
            long,
            default_value_t = DEFAULT_MONTHS,
            value_parser = clap::value_parser!(u32).range(1..=MAX_MONTHS as i64)
        )]
        months: u32,
    },

    /// 履歴・カウンタ・フィードバックをすべて削除
    Clear {
        /// 確認を省略
        #[arg(short, long)]
        yes: bool,
    },

    /// 分別ルール一覧
    Rules,

    /// 設定を表示/編集
    Config {
        /// 保存先ディレクトリを設定
        #[arg(long)]
        set_store_dir: Option<PathBuf>,

        /// ルールカタログJSONを設定
        #[arg(long)]
        set_rules: Option<PathBuf>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Verdict {
    Correct,
    Incorrect,
}
