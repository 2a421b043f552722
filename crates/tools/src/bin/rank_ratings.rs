/// 映画評価エクスポートの集計・順位表作成ツール
///
/// 使い方:
///   # 平均の降順で順位付け
///   rank_ratings exports/ ranking.csv
///
///   # 投票者数→平均で並べ、上位 100 位まで、前回の結果との差分つき
///   rank_ratings exports/ ranking.csv --sort-by dnumvoters dmean \
///       --limit-entries 100 --diffs-file last_ranking.csv
///
///   # 設定ファイル（TOML/JSON/YAML）に CLI 引数を上書き
///   rank_ratings exports/ ranking.csv --config rank.toml --limit-genre drama
use std::fs::File;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use clap::builder::PossibleValuesParser;
use ratings_core::csv_io::write_ranking;
use ratings_core::record::KNOWN_GENRES;
use ratings_core::{FilterPipeline, PipelineConfig, SortKey, TitleType, load_snapshot, run_pipeline};
use ratings_tools::common::io::{open_atomic_writer, open_reader};
use ratings_tools::common::output::confirm_output_path;
use ratings_tools::config_file::load_config_file;
use ratings_tools::ingest::ingest_dir;

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(author, version, about = "Calculate rating rankings from per-user export files")]
struct Cli {
    /// エクスポート CSV を置いたディレクトリ（再帰的に探索）
    indir: PathBuf,

    /// 出力 CSV（`.gz` なら gzip 圧縮）
    outfile: PathBuf,

    /// ソートキー（複数可、順序が優先度）。a = 昇順, d = 降順 + フィールド名（例: dmean ayear）
    #[arg(long = "sort-by", num_args = 1.., value_parser = parse_sort_key)]
    sort_by: Vec<SortKey>,

    /// このファイル（前回の出力）との順位差分を計算する
    #[arg(long = "diffs-file")]
    diffs_file: Option<PathBuf>,

    /// 上位 N 位までを捨てる
    #[arg(long = "discard", value_name = "N")]
    discard: Option<u32>,

    /// 順位 N 以下に制限（同順位は切らない）
    #[arg(long = "limit-entries", value_name = "N")]
    limit_entries: Option<u32>,

    /// 先頭 N 件に制限（同順位も切る）
    #[arg(long = "limit-entries-noties", value_name = "N")]
    limit_entries_noties: Option<usize>,

    #[arg(long = "limit-year-min")]
    limit_year_min: Option<i32>,
    #[arg(long = "limit-year-max")]
    limit_year_max: Option<i32>,

    /// 平均の下限
    #[arg(long = "limit-mean")]
    limit_mean: Option<f64>,
    #[arg(long = "limit-mean-max")]
    limit_mean_max: Option<f64>,

    /// 中央値の下限
    #[arg(long = "limit-median")]
    limit_median: Option<f64>,
    #[arg(long = "limit-median-max")]
    limit_median_max: Option<f64>,

    /// 標準偏差の下限
    #[arg(long = "limit-std")]
    limit_std: Option<f64>,
    #[arg(long = "limit-std-max")]
    limit_std_max: Option<f64>,

    #[arg(long = "limit-voters-min")]
    limit_voters_min: Option<usize>,
    #[arg(long = "limit-voters-max")]
    limit_voters_max: Option<usize>,

    #[arg(long = "limit-runtime-min")]
    limit_runtime_min: Option<u32>,
    #[arg(long = "limit-runtime-max")]
    limit_runtime_max: Option<u32>,

    #[arg(long = "limit-imdbvotes-min")]
    limit_imdbvotes_min: Option<u64>,
    #[arg(long = "limit-imdbvotes-max")]
    limit_imdbvotes_max: Option<u64>,

    #[arg(long = "limit-imdbrating-min")]
    limit_imdbrating_min: Option<f64>,
    #[arg(long = "limit-imdbrating-max")]
    limit_imdbrating_max: Option<f64>,

    /// 作品種別で絞り込む（複数可）
    #[arg(
        long = "limit-titletype",
        num_args = 1..,
        value_parser = PossibleValuesParser::new(TitleType::mnemonics())
    )]
    limit_titletype: Vec<String>,

    /// ジャンルで絞り込む（複数可、どれか 1 つ一致で通す）
    #[arg(long = "limit-genre", num_args = 1.., value_parser = PossibleValuesParser::new(KNOWN_GENRES))]
    limit_genre: Vec<String>,

    /// パイプライン設定ファイル（CLI 引数が優先）
    #[arg(long)]
    config: Option<PathBuf>,

    /// 出力ファイルが既にあっても確認せず上書きする
    #[arg(long)]
    force: bool,

    /// ログの出力先（未指定時は標準エラー）
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn parse_sort_key(s: &str) -> std::result::Result<SortKey, String> {
    s.parse::<SortKey>().map_err(|e| e.to_string())
}

// ---------------------------------------------------------------------------
// 設定の合成
// ---------------------------------------------------------------------------

/// 設定ファイルの値に CLI 引数を項目ごとに上書きする
fn build_config(cli: &Cli, base: PipelineConfig) -> PipelineConfig {
    let mut cfg = base;
    if !cli.sort_by.is_empty() {
        cfg.sort_by = cli.sort_by.clone();
    }

    macro_rules! override_opt {
        ($target:expr, $value:expr) => {
            if let Some(v) = $value {
                $target = Some(v);
            }
        };
    }
    let f = &mut cfg.filter;
    override_opt!(f.year.min, cli.limit_year_min);
    override_opt!(f.year.max, cli.limit_year_max);
    override_opt!(f.mean.min, cli.limit_mean);
    override_opt!(f.mean.max, cli.limit_mean_max);
    override_opt!(f.median.min, cli.limit_median);
    override_opt!(f.median.max, cli.limit_median_max);
    override_opt!(f.std.min, cli.limit_std);
    override_opt!(f.std.max, cli.limit_std_max);
    override_opt!(f.voters.min, cli.limit_voters_min);
    override_opt!(f.voters.max, cli.limit_voters_max);
    override_opt!(f.runtime.min, cli.limit_runtime_min);
    override_opt!(f.runtime.max, cli.limit_runtime_max);
    override_opt!(f.imdb_votes.min, cli.limit_imdbvotes_min);
    override_opt!(f.imdb_votes.max, cli.limit_imdbvotes_max);
    override_opt!(f.imdb_rating.min, cli.limit_imdbrating_min);
    override_opt!(f.imdb_rating.max, cli.limit_imdbrating_max);
    if !cli.limit_titletype.is_empty() {
        f.title_types = cli.limit_titletype.clone();
    }
    if !cli.limit_genre.is_empty() {
        f.genres = cli.limit_genre.clone();
    }

    let l = &mut cfg.limit;
    override_opt!(l.max_rank, cli.limit_entries);
    override_opt!(l.max_entries, cli.limit_entries_noties);
    override_opt!(l.discard_top, cli.discard);
    cfg
}

fn init_logging(log_file: Option<&PathBuf>) -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        None => {
            builder.target(env_logger::Target::Stderr);
        }
    }
    builder.init();
    Ok(())
}

// ---------------------------------------------------------------------------
// メイン処理
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_ref())?;

    let base = match &cli.config {
        Some(path) => load_config_file(path)?,
        None => PipelineConfig::default(),
    };
    let config = build_config(&cli, base);
    // 設定エラーは入力を読む前・出力を作る前に落とす
    FilterPipeline::from_config(&config.filter).context("invalid filter configuration")?;

    let outfile = confirm_output_path(cli.outfile.clone(), cli.force, io::stdin().lock(), io::stderr())
        .context("no output file confirmed")?;

    let snapshot = match &cli.diffs_file {
        Some(path) => {
            let reader = open_reader(path)
                .with_context(|| format!("failed to open diffs file {}", path.display()))?;
            let snapshot = load_snapshot(reader)
                .with_context(|| format!("failed to read diffs file {}", path.display()))?;
            log::info!("loaded {} entries from {}", snapshot.len(), path.display());
            Some(snapshot)
        }
        None => None,
    };

    let (records, _) = ingest_dir(&cli.indir)?;
    let (records, report) = run_pipeline(records, &config, snapshot.as_ref())?;

    let mut writer = open_atomic_writer(&outfile)
        .with_context(|| format!("failed to create {}", outfile.display()))?;
    write_ranking(&mut writer, &records)
        .with_context(|| format!("failed to write {}", outfile.display()))?;
    let written = writer.commit().with_context(|| format!("failed to save {}", outfile.display()))?;
    log::info!("wrote {} entries to {}", report.written, written.display());
    Ok(())
}
