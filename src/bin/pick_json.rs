use std::path::Path;

use anyhow::Context;
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

use raypick::description::Description;
use raypick::targets::MAIN;

fn main() -> anyhow::Result<()> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
		.with_writer(std::io::stderr)
		.init();

	let args = std::env::args().collect::<Vec<String>>();

	if args.len() < 2 {
		eprintln!("usage: {} picking.json", args[0]);
		std::process::exit(1);
	}

	let path = Path::new(&args[1]);
	let description = Description::load(path)
		.with_context(|| format!("failed to read {}", path.display()))?;
	let picking = description.convert(path.parent().unwrap_or(Path::new(".")))?;

	info!(target: MAIN, "picking {} rays against {} objects", picking.rays.len(), picking.scene.objects().len());
	let picks = picking.scene.pick_many(&picking.rays)?;

	for (i, p) in picks.iter().enumerate() {
		let line = match p {
			Some(p) => json!({
				"ray": i,
				"object": p.name,
				"distance": p.pick.distance,
				"triangle": p.pick.triangle,
				"point": [p.pick.point.x, p.pick.point.y, p.pick.point.z],
			}),
			None => json!({ "ray": i, "object": null, "distance": null }),
		};
		println!("{}", line);
	}

	Ok(())
}
