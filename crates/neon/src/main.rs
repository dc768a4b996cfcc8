use std::path::PathBuf;
use std::process::ExitCode;

use neon_sign_lib::export::build_glb;
use neon_sign_lib::{NeonResult, SceneContext, SignGenerator, SignSettings};
use shared::{AnchorStrategy, Rgb, SignRequest};

#[derive(Debug, Default)]
struct CliArgs {
    request: SignRequest,
    settings: Option<PathBuf>,
    font: Option<PathBuf>,
    out: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "neon_sign=info,neon_sign_lib=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("usage: neon-sign [--text T] [--color r,g,b] [--seed N] [--anchors random|nearest] [--font F] [--settings S] [--out sign.glb]");
            return ExitCode::from(2);
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Sign generation failed: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: CliArgs) -> NeonResult<()> {
    let mut settings = match &args.settings {
        Some(path) => SignSettings::load_from(path)?,
        None => SignSettings::load(),
    };
    if args.font.is_some() {
        settings.glyph.font_path = args.font;
    }

    let generator = SignGenerator::new(settings)?;
    let mut scene = SceneContext::new();
    let summary = generator.create_text(&mut scene, &args.request)?;

    if let Some(out) = &args.out {
        let glb = build_glb(&scene)?;
        std::fs::write(out, &glb)?;
        tracing::info!("Wrote {} ({} bytes)", out.display(), glb.len());
    }
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<CliArgs, String> {
    let mut cli = CliArgs::default();
    while let Some(flag) = args.next() {
        let mut value = || args.next().ok_or_else(|| format!("{flag} needs a value"));
        match flag.as_str() {
            "--text" => cli.request.text = value()?,
            "--color" => cli.request.color = parse_color(&value()?)?,
            "--seed" => {
                let v = value()?;
                cli.request.seed = Some(v.parse().map_err(|e| format!("bad seed {v:?}: {e}"))?);
            }
            "--anchors" => {
                cli.request.anchors = Some(match value()?.as_str() {
                    "random" => AnchorStrategy::Random,
                    "nearest" | "nearest_baseline" => AnchorStrategy::NearestBaseline,
                    other => return Err(format!("unknown anchor strategy {other:?}")),
                })
            }
            "--font" => cli.font = Some(value()?.into()),
            "--settings" => cli.settings = Some(value()?.into()),
            "--out" => cli.out = Some(value()?.into()),
            other => return Err(format!("unknown argument {other:?}")),
        }
    }
    Ok(cli)
}

fn parse_color(s: &str) -> Result<Rgb, String> {
    let channels = s
        .split(',')
        .map(|c| c.trim().parse::<f32>().map_err(|e| format!("bad color {s:?}: {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    match channels[..] {
        [r, g, b] => Ok(Rgb(r, g, b)),
        _ => Err(format!("color {s:?} needs three channels")),
    }
}
