use anyhow::Result;
use renderer::{RenderPolicy, Renderer, RendererConfig};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

pub fn run(cli: Cli) -> Result<()> {
    let config = renderer_config(&cli);
    tracing::info!(
        size = ?config.surface_size,
        scale = config.scale,
        policy = ?config.policy,
        "starting warp background"
    );
    Renderer::new(config).run()
}

fn renderer_config(cli: &Cli) -> RendererConfig {
    let policy = if let Some(path) = cli.still_export.clone() {
        RenderPolicy::Export {
            time: cli.still_time,
            path,
        }
    } else if cli.still {
        RenderPolicy::Still {
            time: cli.still_time,
        }
    } else {
        RenderPolicy::Animate {
            target_fps: match cli.fps {
                Some(fps) if fps > 0.0 => Some(fps),
                _ => None,
            },
        }
    };

    RendererConfig {
        surface_size: cli.size,
        scale: cli.scale,
        antialiasing: cli.antialias,
        policy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn export_flag_selects_export_policy() {
        let cli = Cli::parse_from(["warpbg", "--still-export", "out.png", "--still-time", "2.5"]);
        let config = renderer_config(&cli);
        assert!(matches!(
            config.policy,
            RenderPolicy::Export {
                time: Some(t),
                ..
            } if (t - 2.5).abs() < f32::EPSILON
        ));
    }

    #[test]
    fn still_flag_pins_the_clock() {
        let cli = Cli::parse_from(["warpbg", "--still"]);
        let config = renderer_config(&cli);
        assert_eq!(config.policy, RenderPolicy::Still { time: None });
    }

    #[test]
    fn zero_fps_maps_to_uncapped() {
        let cli = Cli::parse_from(["warpbg", "--fps", "0"]);
        let config = renderer_config(&cli);
        assert_eq!(config.policy, RenderPolicy::Animate { target_fps: None });
    }
}
