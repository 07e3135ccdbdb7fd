use anyhow::Context;
use clap::Parser;
use lvr_comps::core::refine::{refine, CompsFilter, SortKey};
use lvr_comps::utils::{logger, validation::Validate};
use lvr_comps::{CliConfig, CompsEngine, CompsOrigin, LiveFetcher, LocalProvider, TomlConfig};
use std::str::FromStr;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting lvr-comps CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 驗證 CLI 參數
    if let Err(e) = cli.validate() {
        tracing::error!("❌ Invalid arguments: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    // 載入並驗證來源設定
    let source_config = match &cli.config {
        Some(path) => TomlConfig::from_file(path)
            .with_context(|| format!("Cannot load config file '{}'", path))?,
        None => TomlConfig::default(),
    };
    if let Err(e) = source_config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let local = LocalProvider::new();
    let coverage = local.coverage();

    let engine = if cli.local_only {
        tracing::info!("📦 Local-only mode, skipping live lookup");
        CompsEngine::local_only(local)
    } else {
        CompsEngine::new(local, LiveFetcher::new(source_config))
    };

    let mut gathered = engine.gather(&cli.city, &cli.district).await;

    // CLI 的排序／截斷套在最終清單上
    let sort = match &cli.sort {
        // validate() 已經擋掉壞值
        Some(key) => SortKey::from_str(key).ok(),
        None => None,
    };
    gathered.comparables = refine(gathered.comparables, &CompsFilter::default(), sort, cli.desc);
    if let Some(limit) = cli.limit {
        gathered.comparables.truncate(limit);
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&gathered)?);
        return Ok(());
    }

    let origin_label = match gathered.origin {
        CompsOrigin::Live => "實價登錄即時資料",
        CompsOrigin::Bundled => "內建資料",
    };
    println!(
        "🏠 {}{} 比較案例（{}，共 {} 筆）",
        gathered.city,
        gathered.district,
        origin_label,
        gathered.comparables.len()
    );

    if gathered.comparables.is_empty() {
        println!("⚠️ 查無比較案例");
        println!("💡 內建資料涵蓋區域: {}", coverage.join("、"));
        return Ok(());
    }

    for comp in &gathered.comparables {
        let date = comp.transaction_date.as_deref().unwrap_or("----");
        let unit_price = comp
            .unit_price()
            .map(|u| format!("{:.0} 元/m²", u))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {} | {} | 總價 {} 萬 | {:.1} m² | {} | 樓層 {} | {}",
            date,
            comp.kind,
            comp.price / 10_000,
            comp.size,
            unit_price,
            if comp.floor.is_empty() { "-" } else { &comp.floor },
            comp.address
        );
    }

    Ok(())
}
