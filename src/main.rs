extern crate nalgebra as na;
extern crate rapier3d as rapier;

use crate::cli::CliArgs;
use crate::report::QueryReport;
use crate::scene::SceneDesc;
use crate::world::SharedPhysicsWorld;
use anyhow::Context;
use clap::Parser;
use rayprobe_query::debug::RayRecorder;
use rayprobe_query::query;
use rayprobe_query::QueryFilter;

mod builtin_scenes;
mod cli;
mod report;
mod scene;
mod world;

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let mut builder = env_logger::Builder::new();
    builder.filter_level(args.log_level());
    builder.parse_default_env();
    builder.init();

    let scene = match &args.scene {
        Some(path) => SceneDesc::from_file(path)?,
        None => args.builtin.unwrap_or_default().build(args.seed),
    };
    let world = scene.build()?;

    let mut filter = QueryFilter::new();
    for name in &args.exclude {
        let handle = world
            .find(name)
            .with_context(|| format!("cannot exclude unknown body `{name}`"))?;
        filter = filter.exclude_body(handle);
    }

    let world = SharedPhysicsWorld::from(world);
    let mut query = query::boxed::<SharedPhysicsWorld>(args.policy, args.scan_mode(), filter);
    let mut recorder = RayRecorder::<SharedPhysicsWorld>::new(args.history.max(1));
    let segment = args.segment();

    for step in 0..=args.steps {
        if step > 0 {
            world.write().step();
        }

        let t0 = instant::Instant::now();
        let hit = query.execute_segment(segment, &world);
        log::info!(
            "Step {}: cast {} in {:.3}ms ({} impacts).",
            step,
            if hit { "hit" } else { "missed" },
            t0.elapsed().as_secs_f32() * 1000.0,
            query.impacts().len()
        );

        recorder.record(query.as_ref());
    }

    let first_step = u64::from(args.steps) + 1 - recorder.len() as u64;
    let reports: Vec<_> = {
        let world = world.read();
        recorder
            .iter()
            .zip(first_step..)
            .map(|(snapshot, step)| QueryReport::new(snapshot, step, &world))
            .collect()
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            print!("{}", report.render_text());
        }
    }

    Ok(())
}
