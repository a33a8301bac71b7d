//! Kern command implementation

use anyhow::{Context, Result};
use glyphtools_core::kern::{determine_kern_detailed, KernParams, KerningQuery};
use kurbo::Vec2;

use super::open_font;
use crate::cli::KernArgs;

pub fn run(args: &KernArgs) -> Result<()> {
    let font = open_font(&args.font)?;

    let to_vec = |offset: Option<(f64, f64)>| offset.map_or(Vec2::ZERO, |(x, y)| Vec2::new(x, y));
    let params = KernParams::new(args.distance)
        .with_offsets(to_vec(args.offset_left), to_vec(args.offset_right))
        .with_max_tuck(Some(args.max_tuck));
    let query = KerningQuery::new(&args.left, &args.right, args.distance).with_params(params);

    let solution = determine_kern_detailed(&font, &query)
        .with_context(|| format!("Failed to kern {}/{}", args.left, args.right))?;

    if args.explain {
        println!(
            "{}/{}: kern={} distance={:.1} rounds={} stop={:?}",
            args.left, args.right, solution.kern, solution.distance, solution.rounds, solution.stop
        );
    } else {
        println!("{}", solution.kern);
    }
    Ok(())
}
