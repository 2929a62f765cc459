//! 큐브 접근 권한 확인

use std::sync::Arc;

use cbx_core::model::Cube;

use crate::commands::{print_json, OutputFormat};
use crate::context::EffectiveContext;

/// 허용된 큐브 이름 출력 (큐브를 지정하지 않으면 카탈로그 전체)
pub fn authorize(ctx: &EffectiveContext, cubes: &[String], format: OutputFormat) -> anyhow::Result<()> {
    let identity = ctx.require_identity()?;

    let candidates: Vec<Arc<Cube>> = if cubes.is_empty() {
        ctx.catalog.cubes.iter().cloned().map(Arc::new).collect()
    } else {
        cubes
            .iter()
            .map(|name| ctx.cube(name))
            .collect::<anyhow::Result<Vec<_>>>()?
    };

    let authorized = ctx.authorizer.authorize_names(identity, &candidates);

    match format {
        OutputFormat::Json => print_json(&authorized)?,
        OutputFormat::Text => {
            if authorized.is_empty() {
                println!("No authorized cubes.");
            }
            for name in authorized {
                println!("{}", name);
            }
        }
    }

    Ok(())
}
