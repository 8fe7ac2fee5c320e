use std::str::FromStr;

use clap::{Arg, ArgAction, Command};
use radarsim::logging::{init_logging, resolve_level, LogConfig, LogOutput};
use radarsim::scenario::ScenarioConfig;
use radarsim::simulation::{SweepEngine, SweepSummary};
use tracing::{error, info};

fn main() {
    // コマンドライン引数の解析
    let matches = Command::new("radarsim")
        .version("0.1.0")
        .about("走査レーダー探知シミュレーション (Scanning Radar Simulation)")
        .long_about("固定レーダーが水平方向にパルスを掃引し、ターゲットへの命中と\n\
                     エコーの帰還を時間刻みで判定します。")
        .arg(
            Arg::new("scenario")
                .short('s')
                .long("scenario")
                .value_name("FILE")
                .help("シナリオファイル(.yaml)のパスを指定")
                .conflicts_with("demo")
        )
        .arg(
            Arg::new("info")
                .short('i')
                .long("info")
                .action(ArgAction::SetTrue)
                .help("シナリオの情報のみ表示して終了")
        )
        .arg(
            Arg::new("demo")
                .short('d')
                .long("demo")
                .action(ArgAction::SetTrue)
                .help("組み込みの基準シナリオを実行")
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("詳細出力レベル (-v: スキャンごと, -vv: 位置サンプルまで)")
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .help("ログレベル (trace, debug, info, warn, error)。-v より優先")
        )
        .arg(
            Arg::new("log-output")
                .long("log-output")
                .value_name("TARGET")
                .default_value("console")
                .help("ログ出力先 (console, file, both)")
        )
        .arg(
            Arg::new("log-dir")
                .long("log-dir")
                .value_name("DIR")
                .default_value("logs")
                .help("ログファイルのディレクトリ")
        )
        .get_matches();

    let scenario = if matches.get_flag("demo") {
        ScenarioConfig::default_scenario()
    } else if let Some(path) = matches.get_one::<String>("scenario") {
        match ScenarioConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("エラー: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        show_default_help();
        return;
    };

    if matches.get_flag("info") {
        scenario.print_summary();
        return;
    }

    let output = matches
        .get_one::<String>("log-output")
        .map(|s| LogOutput::from_str(s))
        .transpose();
    let output = match output {
        Ok(output) => output.unwrap_or(LogOutput::Console),
        Err(e) => {
            eprintln!("エラー: {}", e);
            std::process::exit(1);
        }
    };

    let log_config = LogConfig {
        level: resolve_level(
            matches.get_one::<String>("log-level").map(String::as_str),
            matches.get_count("verbose"),
        ),
        output,
        log_dir: matches
            .get_one::<String>("log-dir")
            .cloned()
            .unwrap_or_else(|| "logs".to_string()),
        ..LogConfig::default()
    };

    let _guard = match init_logging(log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("エラー: ログ初期化に失敗しました: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run_scenario(scenario) {
        error!("{}", e);
        eprintln!("エラー: {}", e);
        std::process::exit(1);
    }
}

/// シナリオを実行して結果を表示
fn run_scenario(scenario: ScenarioConfig) -> Result<(), Box<dyn std::error::Error>> {
    scenario.print_summary();
    println!();

    info!("シナリオ '{}' を実行します", scenario.meta.name);
    let mut engine = SweepEngine::new(scenario)?;
    let summary = engine.run();
    print_result(&summary);

    Ok(())
}

fn print_result(summary: &SweepSummary) {
    println!("=== 掃引結果 ===");
    println!("スキャン数: {}", summary.scans);
    println!("命中: {} (エコー帰還 {} / 消失 {})", summary.hits, summary.returned, summary.lost);
    println!("失探: {}", summary.misses);
    if summary.skipped > 0 {
        println!("スキップ: {}", summary.skipped);
    }
    match summary.first_hit_heading {
        Some(heading) => println!("最初の命中方位: {:.1}°", heading),
        None => println!("ターゲットは探知されませんでした"),
    }
}

/// デフォルトヘルプを表示
fn show_default_help() {
    println!("使用方法:");
    println!("  radarsim [オプション]");
    println!();
    println!("オプション:");
    println!("  -s, --scenario <FILE>   シナリオファイルを指定して実行");
    println!("  -d, --demo              基準シナリオを実行");
    println!("  -i, --info              シナリオ情報のみ表示");
    println!("  -v, --verbose           詳細出力 (複数指定で詳細レベル上昇)");
    println!("      --log-level <LEVEL> ログレベル (trace, debug, info, warn, error)");
    println!("      --log-output <T>    ログ出力先 (console, file, both)");
    println!("      --log-dir <DIR>     ログファイルのディレクトリ");
    println!("  -h, --help              このヘルプを表示");
    println!();
    println!("利用可能なシナリオファイル:");
    println!("  scenarios/reference.yaml   - 基準シナリオ (1周掃引)");
    println!("  scenarios/off_axis.yaml    - +X軸から外れたターゲット");
    println!("  scenarios/live_sector.yaml - 扇形掃引のライブ表示");
    println!();
    println!("例:");
    println!("  radarsim --demo");
    println!("  radarsim -s scenarios/reference.yaml -v");
    println!("  radarsim -s scenarios/live_sector.yaml -vv");
    println!("  radarsim -s scenarios/off_axis.yaml -i");
    println!("  radarsim -s scenarios/off_axis.yaml --log-level warn");
}
