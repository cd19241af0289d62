use crate::builtin_scenes::BuiltinScene;
use na::Point3;
use rapier::math::Real;
use rayprobe_query::{RayEndpoints, ReductionPolicy, ScanMode};
use std::path::PathBuf;

#[derive(clap::Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Scene description file (JSON).
    #[arg(long, conflicts_with = "builtin")]
    pub scene: Option<PathBuf>,
    /// Built-in scene used when no scene file is given.
    #[arg(long)]
    pub builtin: Option<BuiltinScene>,
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
    #[arg(long, value_parser = parse_point, default_value = "0,0.5,0")]
    pub from: Point3<Real>,
    #[arg(long, value_parser = parse_point, default_value = "30,0.5,0")]
    pub to: Point3<Real>,
    /// Number of simulation steps. The ray is cast again after each step.
    #[arg(long, default_value_t = 0)]
    pub steps: u32,
    #[arg(long, default_value_t = ReductionPolicy::Closest)]
    pub policy: ReductionPolicy,
    /// Let closest-hit queries shrink the scanned range as impacts are found.
    #[arg(long, default_value_t = false)]
    pub pruned: bool,
    /// Name of a body the ray ignores. Can be repeated.
    #[arg(long)]
    pub exclude: Vec<String>,
    /// Number of cast snapshots kept and reported.
    #[arg(long, default_value_t = 1)]
    pub history: usize,
    #[arg(long, default_value_t = false)]
    pub json: bool,
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl CliArgs {
    pub fn segment(&self) -> RayEndpoints {
        RayEndpoints::new(self.from, self.to)
    }

    pub fn scan_mode(&self) -> ScanMode {
        if self.pruned {
            ScanMode::Pruned
        } else {
            ScanMode::Exhaustive
        }
    }

    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

fn parse_point(s: &str) -> Result<Point3<Real>, String> {
    let coords = s
        .split(',')
        .map(|c| c.trim().parse::<Real>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid coordinate in `{s}`: {e}"))?;

    match coords[..] {
        [x, y, z] => Ok(Point3::new(x, y, z)),
        _ => Err(format!("expected three comma-separated coordinates, got `{s}`")),
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_point, CliArgs};
    use crate::builtin_scenes::BuiltinScene;
    use clap::Parser;
    use na::Point3;
    use rayprobe_query::{ReductionPolicy, ScanMode};

    #[test]
    fn parses_points() {
        assert_eq!(parse_point("1,2.5,-3"), Ok(Point3::new(1.0, 2.5, -3.0)));
        assert_eq!(parse_point(" 0, 0 ,0"), Ok(Point3::origin()));
        assert!(parse_point("1,2").is_err());
        assert!(parse_point("1,2,x").is_err());
    }

    #[test]
    fn defaults() {
        let args = CliArgs::try_parse_from(["rayprobe"]).unwrap();

        assert_eq!(args.policy, ReductionPolicy::Closest);
        assert_eq!(args.scan_mode(), ScanMode::Exhaustive);
        assert_eq!(args.segment().start, Point3::new(0.0, 0.5, 0.0));
        assert!(args.scene.is_none());
        assert_eq!(args.log_level(), log::LevelFilter::Info);
    }

    #[test]
    fn full_command_line() {
        let args = CliArgs::try_parse_from([
            "rayprobe",
            "--builtin",
            "scatter",
            "--from=-5,0,0",
            "--to",
            "5,0,0",
            "--policy",
            "all",
            "--pruned",
            "--exclude",
            "ball_1",
            "--exclude",
            "ball_2",
            "-vv",
        ])
        .unwrap();

        assert_eq!(args.builtin, Some(BuiltinScene::Scatter));
        assert_eq!(args.policy, ReductionPolicy::All);
        assert_eq!(args.scan_mode(), ScanMode::Pruned);
        assert_eq!(args.exclude, ["ball_1", "ball_2"]);
        assert_eq!(args.segment().start, Point3::new(-5.0, 0.0, 0.0));
        assert_eq!(args.log_level(), log::LevelFilter::Trace);
    }

    #[test]
    fn scene_file_conflicts_with_builtin() {
        assert!(CliArgs::try_parse_from(["rayprobe", "--scene", "a.json", "--builtin", "wall"]).is_err());
    }
}
