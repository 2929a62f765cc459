//! hierarchy limit 확인

use crate::commands::{print_json, OutputFormat};
use crate::context::EffectiveContext;

pub fn hierarchy_limits(
    ctx: &EffectiveContext,
    cube_name: &str,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let identity = ctx.require_identity()?;
    let cube = ctx.cube(cube_name)?;

    let limits = ctx.authorizer.hierarchy_limits(identity, &cube)?;

    match format {
        OutputFormat::Json => print_json(&limits)?,
        OutputFormat::Text => {
            if limits.is_empty() {
                println!("No hierarchy limits for {}.", cube.name);
            }
            for limit in limits {
                println!("{}", limit);
            }
        }
    }

    Ok(())
}
