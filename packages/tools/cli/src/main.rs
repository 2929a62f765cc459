//! Cube rights CLI (`cbx`)
//!
//! 권한 제공자 설정과 큐브별 접근 권한, 셀 제한, hierarchy limit을 확인하는 도구입니다.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod context;

use commands::OutputFormat;
use config::CliConfig;
use context::ContextArgs;

#[derive(Parser)]
#[command(name = "cbx")]
#[command(author, version, about = "Cube rights CLI - inspect cube authorization", long_about = None)]
struct Cli {
    /// Rights provider URL (overrides CBX_RIGHTS_URL and config)
    #[arg(long, global = true)]
    url: Option<String>,

    /// Allow/deny order (allow_deny | deny_allow)
    #[arg(long, global = true)]
    order: Option<String>,

    /// Static rights file (YAML, keyed by identity) instead of the HTTP provider
    #[arg(long, global = true)]
    rights: Option<PathBuf>,

    /// Cube model file (YAML)
    #[arg(long, global = true)]
    model: Option<PathBuf>,

    /// Identity to check
    #[arg(long, global = true)]
    identity: Option<String>,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    // ─────────────────────────────────────────────────────────────────────────
    // Cubes
    // ─────────────────────────────────────────────────────────────────────────
    /// List authorized cubes (all model cubes when none given)
    Authorize {
        cubes: Vec<String>,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Restrictions
    // ─────────────────────────────────────────────────────────────────────────
    /// Show the requested cell with the identity's restrictions applied
    RestrictedCell {
        #[arg(long)]
        cube: String,

        /// Cut in string form (repeatable), e.g. `date:2010` or `!region:EU;US`
        #[arg(long = "cut")]
        cuts: Vec<String>,
    },

    /// Show hierarchy limits for a cube
    HierarchyLimits {
        #[arg(long)]
        cube: String,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "cbx=info,cbx_core=info,cbx_sql=info".into()
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    // 설정 로드
    let config = CliConfig::load()?;

    let model = cli
        .model
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("Model file not specified. Use --model <yaml>"))?;

    // 컨텍스트 결정 (CLI 옵션 > 환경변수 > 설정 파일)
    let ctx = context::resolve_context(
        &config,
        ContextArgs {
            url: cli.url.as_deref(),
            order: cli.order.as_deref(),
            rights: cli.rights.as_ref(),
            model,
            identity: cli.identity.as_deref(),
        },
    )?;

    // 명령 실행
    match cli.command {
        Commands::Authorize { cubes } => commands::authorize::authorize(&ctx, &cubes, cli.format),
        Commands::RestrictedCell { cube, cuts } => {
            commands::restricted_cell::restricted_cell(&ctx, &cube, &cuts, cli.format)
        }
        Commands::HierarchyLimits { cube } => {
            commands::hierarchy_limits::hierarchy_limits(&ctx, &cube, cli.format)
        }
    }
}
