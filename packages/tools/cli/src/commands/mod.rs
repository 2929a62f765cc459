//! CLI 명령어 구현

pub mod authorize;
pub mod hierarchy_limits;
pub mod restricted_cell;

/// 출력 형식
#[derive(Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// JSON 출력
pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
