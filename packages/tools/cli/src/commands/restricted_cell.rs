//! 셀 제한 확인

use cbx_core::cells::{Cell, Cut};

use crate::commands::{print_json, OutputFormat};
use crate::context::EffectiveContext;

/// 요청 셀에 identity의 제한을 적용한 결과 출력
pub fn restricted_cell(
    ctx: &EffectiveContext,
    cube_name: &str,
    cuts: &[String],
    format: OutputFormat,
) -> anyhow::Result<()> {
    let identity = ctx.require_identity()?;
    let cube = ctx.cube(cube_name)?;

    let requested = cuts
        .iter()
        .map(|cut| Cut::from_string(cut, &cube))
        .collect::<cbx_core::Result<Vec<_>>>()?;
    let cell = Cell::with_cuts(cube.clone(), requested);

    let restricted = ctx.authorizer.restricted_cell(identity, &cube, Some(&cell))?;

    match format {
        OutputFormat::Json => print_json(&restricted.cuts())?,
        OutputFormat::Text => {
            println!("Cell for {}:", cube.name);
            if restricted.is_empty() {
                println!("  (whole cube)");
            }
            for cut in restricted.cuts() {
                if cut.hidden {
                    println!("  - {} (hidden)", cut);
                } else {
                    println!("  - {}", cut);
                }
            }
        }
    }

    Ok(())
}
